//! CSV Import service
//!
//! Loads a spreadsheet export into the customer snapshot. The header row
//! holds field keys (`customerNo`, `regDate`, ...); columns that are not
//! known fields are kept on the record as extra cells.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde_json::Value;
use tracing::{debug, warn};

use crate::audit::{generate_diff, AuditEntry};
use crate::error::{DashboardError, DashboardResult};
use crate::models::{is_blank, CustomerRecord, FIELD_KEYS};
use crate::storage::Storage;

/// A row that could not be imported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based data row number (header excluded)
    pub row_number: usize,
    pub reason: String,
}

/// Result of a completed import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportResult {
    /// Customer numbers added to the snapshot
    pub created: Vec<String>,
    /// Customer numbers whose record was replaced
    pub replaced: Vec<String>,
    /// Rows left out
    pub skipped: Vec<SkippedRow>,
}

impl ImportResult {
    /// Total number of records written
    pub fn imported(&self) -> usize {
        self.created.len() + self.replaced.len()
    }
}

/// Parse CSV rows into records
///
/// Rows without a customer number are reported as skipped rather than
/// failing the whole file.
pub fn parse_csv<R: Read>(reader: R) -> DashboardResult<(Vec<CustomerRecord>, Vec<SkippedRow>)> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| DashboardError::Import(format!("Failed to read header row: {}", e)))?
        .clone();
    if !headers.iter().any(|h| h == "customerNo") {
        return Err(DashboardError::Import(
            "Header row has no customerNo column".into(),
        ));
    }

    let mut records = Vec::new();
    let mut skipped = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row_number = index + 1;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(row = row_number, error = %e, "unreadable CSV row");
                skipped.push(SkippedRow {
                    row_number,
                    reason: format!("Unreadable row: {}", e),
                });
                continue;
            }
        };

        let record = record_from_row(&headers, &row)?;
        if is_blank(&record.customer_no) {
            warn!(row = row_number, "skipping row without customerNo");
            skipped.push(SkippedRow {
                row_number,
                reason: "Missing customerNo".into(),
            });
            continue;
        }
        records.push(record);
    }

    debug!(parsed = records.len(), skipped = skipped.len(), "parsed customer CSV");
    Ok((records, skipped))
}

fn record_from_row(headers: &StringRecord, row: &StringRecord) -> DashboardResult<CustomerRecord> {
    let mut record = CustomerRecord::default();
    for (key, value) in headers.iter().zip(row.iter()) {
        if key.is_empty() {
            continue;
        }
        if FIELD_KEYS.contains(&key) {
            record.set_field(key, value)?;
        } else {
            record
                .extra
                .insert(key.to_string(), Value::String(value.to_string()));
        }
    }
    record.normalize_dates();
    Ok(record)
}

/// Service for CSV import
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    /// Create a new import service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Import a CSV file
    pub fn import_file(&self, path: &Path) -> DashboardResult<ImportResult> {
        let file = std::fs::File::open(path).map_err(|e| {
            DashboardError::Import(format!("Failed to open {}: {}", path.display(), e))
        })?;
        self.import_reader(file)
    }

    /// Import CSV data from any reader
    ///
    /// Existing customer numbers are replaced in place, new ones appended.
    pub fn import_reader<R: Read>(&self, reader: R) -> DashboardResult<ImportResult> {
        let (records, skipped) = parse_csv(reader)?;
        let mut result = ImportResult {
            skipped,
            ..Default::default()
        };
        let mut entries = Vec::with_capacity(records.len());

        for record in records {
            let previous = self.storage.customers.get(&record.customer_no)?;
            let diff = previous.as_ref().and_then(|before| {
                let before = serde_json::to_value(before).ok()?;
                let after = serde_json::to_value(&record).ok()?;
                generate_diff(&before, &after)
            });
            entries.push(AuditEntry::import(
                record.customer_no.clone(),
                Some(record.name.clone()),
                previous.as_ref(),
                &record,
                diff,
            ));

            let customer_no = record.customer_no.clone();
            if self.storage.customers.upsert(record)? {
                result.created.push(customer_no);
            } else {
                result.replaced.push(customer_no);
            }
        }

        if result.imported() > 0 {
            self.storage.customers.save()?;
            self.storage.audit().log_batch(&entries)?;
        }

        Ok(result)
    }
}
