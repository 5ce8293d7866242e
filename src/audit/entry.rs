//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kinds of audited changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Record added from the editor
    Create,
    /// Record changed from the editor
    Update,
    /// Record added or replaced by a CSV import
    Import,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Import => write!(f, "IMPORT"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the change was made (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    /// Customer number of the affected record
    pub customer_no: String,

    /// Customer name at the time of the change
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    /// Record before the change (updates and replacing imports)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// Record after the change
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Human-readable diff summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn new(operation: Operation, customer_no: impl Into<String>, customer_name: Option<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            customer_no: customer_no.into(),
            customer_name: customer_name.filter(|n| !n.trim().is_empty()),
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    /// Entry for a newly created record
    pub fn create<T: Serialize>(
        customer_no: impl Into<String>,
        customer_name: Option<String>,
        record: &T,
    ) -> Self {
        Self {
            after: serde_json::to_value(record).ok(),
            ..Self::new(Operation::Create, customer_no, customer_name)
        }
    }

    /// Entry for an edited record
    pub fn update<T: Serialize>(
        customer_no: impl Into<String>,
        customer_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Self {
        Self {
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            diff_summary,
            ..Self::new(Operation::Update, customer_no, customer_name)
        }
    }

    /// Entry for an imported record, with the record it replaced if any
    pub fn import<T: Serialize>(
        customer_no: impl Into<String>,
        customer_name: Option<String>,
        before: Option<&T>,
        after: &T,
        diff_summary: Option<String>,
    ) -> Self {
        Self {
            before: before.and_then(|b| serde_json::to_value(b).ok()),
            after: serde_json::to_value(after).ok(),
            diff_summary,
            ..Self::new(Operation::Import, customer_no, customer_name)
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.customer_no
        );

        if let Some(name) = &self.customer_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::Update.to_string(), "UPDATE");
        assert_eq!(Operation::Import.to_string(), "IMPORT");
    }

    #[test]
    fn test_create_entry() {
        let record = json!({"customerNo": "C-00001", "name": "김철수"});
        let entry = AuditEntry::create("C-00001", Some("김철수".into()), &record);

        assert_eq!(entry.operation, Operation::Create);
        assert_eq!(entry.customer_no, "C-00001");
        assert!(entry.before.is_none());
        assert_eq!(entry.after, Some(record));
    }

    #[test]
    fn test_blank_name_is_dropped() {
        let entry = AuditEntry::create("C-00001", Some("  ".into()), &json!({}));
        assert!(entry.customer_name.is_none());
    }

    #[test]
    fn test_update_entry() {
        let before = json!({"esignStatus": "발송완료"});
        let after = json!({"esignStatus": "서명완료"});
        let entry = AuditEntry::update(
            "C-00001",
            None,
            &before,
            &after,
            Some("esignStatus: \"발송완료\" -> \"서명완료\"".into()),
        );

        assert_eq!(entry.operation, Operation::Update);
        assert!(entry.before.is_some());
        assert!(entry.after.is_some());
    }

    #[test]
    fn test_import_entry_without_previous() {
        let after = json!({"customerNo": "C-00002"});
        let entry = AuditEntry::import::<serde_json::Value>("C-00002", None, None, &after, None);

        assert_eq!(entry.operation, Operation::Import);
        assert!(entry.before.is_none());
    }

    #[test]
    fn test_serialization_round_trip() {
        let entry = AuditEntry::create("C-00001", None, &json!({"name": "Test"}));
        let line = serde_json::to_string(&entry).unwrap();
        assert!(line.contains("\"operation\":\"create\""));
        assert!(!line.contains("before"));

        let parsed: AuditEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed.customer_no, "C-00001");
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::update(
            "C-00003",
            Some("이영희".into()),
            &json!({}),
            &json!({}),
            Some("memo: \"\" -> \"재방문\"".into()),
        );

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("UPDATE C-00003 (이영희)"));
        assert!(formatted.contains("Changes: memo"));
    }
}
