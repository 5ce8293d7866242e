//! Storage layer for the KCC dashboard
//!
//! Provides JSON file storage for the customer snapshot with atomic writes
//! and automatic directory creation.

pub mod customers;
pub mod file_io;
pub mod init;

pub use customers::CustomerRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::paths::DashboardPaths;
use crate::error::DashboardError;

/// Main storage coordinator that provides access to the repositories
pub struct Storage {
    paths: DashboardPaths,
    pub customers: CustomerRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: DashboardPaths) -> Result<Self, DashboardError> {
        paths.ensure_directories()?;

        Ok(Self {
            customers: CustomerRepository::new(paths.customers_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &DashboardPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), DashboardError> {
        self.customers.load()
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), DashboardError> {
        self.customers.save()
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// The audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Record a created customer in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        customer_no: impl Into<String>,
        customer_name: Option<String>,
        record: &T,
    ) -> Result<(), DashboardError> {
        self.audit
            .log(&AuditEntry::create(customer_no, customer_name, record))
    }

    /// Record an edited customer in the audit log
    pub fn log_update<T: Serialize>(
        &self,
        customer_no: impl Into<String>,
        customer_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Result<(), DashboardError> {
        self.audit.log(&AuditEntry::update(
            customer_no,
            customer_name,
            before,
            after,
            diff_summary,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CustomerRecord;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = DashboardPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_save_all_and_load_all() {
        let temp_dir = TempDir::new().unwrap();
        let paths = DashboardPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths.clone()).unwrap();
        storage.customers.upsert(CustomerRecord::new("C-00001")).unwrap();
        storage.save_all().unwrap();

        let mut reopened = Storage::new(paths).unwrap();
        reopened.load_all().unwrap();
        assert_eq!(reopened.customers.count().unwrap(), 1);
    }

    #[test]
    fn test_log_helpers_append_to_audit_log() {
        let temp_dir = TempDir::new().unwrap();
        let paths = DashboardPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        let before = CustomerRecord::new("C-00001");
        let mut after = before.clone();
        after.memo = "재방문".into();

        storage.log_create("C-00001", None, &before).unwrap();
        storage
            .log_update("C-00001", None, &before, &after, None)
            .unwrap();

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(temp_dir.path().join("audit.log").exists());
    }
}
