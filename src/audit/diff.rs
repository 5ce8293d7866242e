//! Field diffs for audit entries
//!
//! Customer records are flat maps of text cells, so diffs only look at
//! top-level keys.

use serde_json::Value;

/// Longest value shown in a diff before it is cut off
const MAX_VALUE_CHARS: usize = 40;

/// Keys whose values differ between two record objects
///
/// Keys are reported in the order they appear in `after`, then keys that
/// only exist in `before`.
pub fn changed_fields(before: &Value, after: &Value) -> Vec<String> {
    let (Value::Object(before_obj), Value::Object(after_obj)) = (before, after) else {
        return Vec::new();
    };

    let mut keys: Vec<String> = after_obj
        .iter()
        .filter(|(key, value)| before_obj.get(key.as_str()) != Some(*value))
        .map(|(key, _)| key.clone())
        .collect();
    keys.extend(
        before_obj
            .keys()
            .filter(|key| !after_obj.contains_key(key.as_str()))
            .cloned(),
    );
    keys
}

/// Summarize the changes between two record objects
///
/// Returns None when nothing changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes: Vec<String> = changed_fields(before, after)
        .into_iter()
        .map(|key| {
            let old = before.get(&key).map(format_value);
            let new = after.get(&key).map(format_value);
            format!(
                "{}: {} -> {}",
                key,
                old.as_deref().unwrap_or("(absent)"),
                new.as_deref().unwrap_or("(removed)")
            )
        })
        .collect();

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > MAX_VALUE_CHARS => {
            let head: String = s.chars().take(MAX_VALUE_CHARS - 3).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
        other => other.to_string(),
    }
}
