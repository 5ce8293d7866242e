//! JSON Export functionality

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{DashboardError, DashboardResult};
use crate::models::CustomerRecord;

/// Version of the customer export layout
pub const EXPORT_SCHEMA_VERSION: u32 = 1;

/// A customer list as exported to JSON
#[derive(Debug, Clone, Serialize)]
pub struct CustomerExport<'a> {
    pub schema_version: u32,
    pub exported_at: DateTime<Utc>,
    pub app_version: &'static str,
    pub count: usize,
    pub customers: &'a [CustomerRecord],
}

impl<'a> CustomerExport<'a> {
    /// Wrap a customer list for export
    pub fn new(customers: &'a [CustomerRecord]) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION"),
            count: customers.len(),
            customers,
        }
    }
}

/// Export any report as pretty JSON
pub fn export_report_json<T: Serialize, W: Write>(report: &T, writer: &mut W) -> DashboardResult<()> {
    serde_json::to_writer_pretty(&mut *writer, report)
        .map_err(|e| DashboardError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| DashboardError::Export(e.to_string()))
}

/// Export a customer list as pretty JSON
pub fn export_customers_json<W: Write>(
    customers: &[CustomerRecord],
    writer: &mut W,
) -> DashboardResult<()> {
    export_report_json(&CustomerExport::new(customers), writer)
}
