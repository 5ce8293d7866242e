//! CLI command handler for CSV import
//!
//! Loads a spreadsheet export into the customer snapshot and reports what
//! was added, replaced and skipped.

use std::path::Path;

use crate::error::{DashboardError, DashboardResult};
use crate::services::ImportService;
use crate::storage::Storage;

/// Handle the import command
pub fn handle_import_command(storage: &Storage, file: &Path) -> DashboardResult<()> {
    if !file.exists() {
        return Err(DashboardError::Import(format!(
            "File not found: {}",
            file.display()
        )));
    }

    let result = ImportService::new(storage).import_file(file)?;

    println!("Import Complete!");
    println!("  New customers:  {}", result.created.len());
    println!("  Replaced:       {}", result.replaced.len());
    println!("  Skipped rows:   {}", result.skipped.len());
    for row in &result.skipped {
        println!("    Row {}: {}", row.row_number, row.reason);
    }

    Ok(())
}
