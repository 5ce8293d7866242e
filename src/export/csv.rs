//! CSV Export functionality
//!
//! Writes customers with every known column in sheet order, followed by
//! any extra columns found on the exported records.

use std::collections::BTreeSet;
use std::io::Write;

use serde_json::Value;

use crate::error::{DashboardError, DashboardResult};
use crate::models::{CustomerRecord, FIELD_KEYS};

/// Export customers to CSV
pub fn export_customers_csv<W: Write>(records: &[CustomerRecord], writer: W) -> DashboardResult<()> {
    let extra_keys: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.extra.keys().map(String::as_str))
        .filter(|k| !FIELD_KEYS.contains(k))
        .collect();

    let mut csv_writer = ::csv::Writer::from_writer(writer);
    let header: Vec<&str> = FIELD_KEYS.iter().copied().chain(extra_keys.iter().copied()).collect();
    csv_writer.write_record(&header)?;

    for record in records {
        let mut row: Vec<String> = FIELD_KEYS
            .iter()
            .map(|key| record.field(key).unwrap_or_default().to_string())
            .collect();
        row.extend(extra_keys.iter().map(|key| match record.extra.get(*key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }));
        csv_writer.write_record(&row)?;
    }

    csv_writer
        .flush()
        .map_err(|e| DashboardError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::import::parse_csv;

    fn sample() -> Vec<CustomerRecord> {
        let mut a = CustomerRecord::new("C-00001");
        a.name = "김철수".into();
        a.address = "서울, 강남구".into();
        a.final_quote = "12000000".into();
        a.extra.insert("salesRep".into(), Value::String("Park".into()));

        let mut b = CustomerRecord::new("C-00002");
        b.memo = "line \"quoted\"".into();
        b.extra.insert("priority".into(), serde_json::json!(2));
        vec![a, b]
    }

    #[test]
    fn test_header_layout() {
        let mut buffer = Vec::new();
        export_customers_csv(&sample(), &mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();

        let header = csv.lines().next().unwrap();
        assert!(header.starts_with("customerNo,branch,regDate"));
        assert!(header.ends_with("memo,priority,salesRep"));
        assert!(csv.contains("\"서울, 강남구\""));
    }

    #[test]
    fn test_importer_reads_export() {
        let mut buffer = Vec::new();
        export_customers_csv(&sample(), &mut buffer).unwrap();

        let (records, skipped) = parse_csv(buffer.as_slice()).unwrap();
        assert!(skipped.is_empty());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].address, "서울, 강남구");
        assert_eq!(records[1].memo, "line \"quoted\"");
        assert_eq!(records[1].extra.get("priority"), Some(&Value::String("2".into())));
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let mut buffer = Vec::new();
        export_customers_csv(&[], &mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
