//! Date cells as the snapshot delivers them
//!
//! Dates arrive as free text. Prefix comparisons (period filters, calendar
//! lookups) work on the raw string; chronological comparisons go through
//! [`parse_date`], which never fails loudly: anything it cannot read is
//! simply "no date".

use chrono::{DateTime, Datelike, NaiveDate};

/// Layouts accepted after the ISO prefix check
const FALLBACK_FORMATS: &[&str] = &["%Y/%m/%d", "%Y.%m.%d", "%Y. %m. %d"];

/// Parse a date cell into a calendar date
///
/// Accepts `YYYY-MM-DD` (optionally followed by a time part), RFC 3339
/// timestamps and the slash/dot layouts spreadsheets commonly produce.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }

    if let Some(prefix) = iso_prefix(t) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Some(date);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Some(dt.date_naive());
    }

    let t = t.trim_end_matches('.');
    FALLBACK_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(t, fmt).ok())
}

/// Normalize a date cell for display
///
/// `YYYY-MM-DD`-prefixed text is cut to its first ten characters, other
/// parseable text is re-formatted, and anything else is returned trimmed.
pub fn format_date(s: &str) -> String {
    let t = s.trim();
    if t.is_empty() {
        return String::new();
    }
    if let Some(prefix) = iso_prefix(t) {
        return prefix.to_string();
    }
    match parse_date(t) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => t.to_string(),
    }
}

/// The `YYYY-MM` key of a date
pub fn year_month(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// The `YYYY-MM-DD` key of a date
pub fn ymd(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Returns the leading `DDDD-DD-DD` slice when the text starts with one
fn iso_prefix(t: &str) -> Option<&str> {
    let bytes = t.as_bytes();
    if bytes.len() < 10 {
        return None;
    }
    let shape_ok = bytes[..10].iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    if shape_ok {
        Some(&t[..10])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_iso() {
        assert_eq!(parse_date("2025-03-07"), Some(d(2025, 3, 7)));
        assert_eq!(parse_date(" 2025-03-07 "), Some(d(2025, 3, 7)));
        assert_eq!(parse_date("2025-03-07 14:30:00"), Some(d(2025, 3, 7)));
        assert_eq!(parse_date("2025-03-07T00:00:00.000Z"), Some(d(2025, 3, 7)));
    }

    #[test]
    fn test_parse_spreadsheet_layouts() {
        assert_eq!(parse_date("2025/03/07"), Some(d(2025, 3, 7)));
        assert_eq!(parse_date("2025.03.07"), Some(d(2025, 3, 7)));
        assert_eq!(parse_date("2025. 3. 7."), Some(d(2025, 3, 7)));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("미정"), None);
        assert_eq!(parse_date("2025-13-40"), None);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2025-03-07T09:00:00Z"), "2025-03-07");
        assert_eq!(format_date("2025/3/7"), "2025-03-07");
        assert_eq!(format_date(" 협의중 "), "협의중");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_keys() {
        assert_eq!(year_month(d(2025, 3, 7)), "2025-03");
        assert_eq!(ymd(d(2025, 3, 7)), "2025-03-07");
    }
}
