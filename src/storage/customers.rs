//! Customer repository for JSON storage
//!
//! Manages loading and saving the customer snapshot to customers.json.
//! Records keep the order they had in the source sheet.

use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DashboardError;
use crate::models::CustomerRecord;

use super::file_io::{read_json, write_json_atomic};

/// Prefix of generated customer numbers
pub const CUSTOMER_NO_PREFIX: &str = "C-";

/// On-disk snapshot
///
/// Sheet exports are bare arrays; files written by this repository wrap
/// them in an object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum CustomerData {
    Wrapped { customers: Vec<CustomerRecord> },
    Bare(Vec<CustomerRecord>),
}

impl Default for CustomerData {
    fn default() -> Self {
        Self::Wrapped {
            customers: Vec::new(),
        }
    }
}

impl CustomerData {
    fn into_records(self) -> Vec<CustomerRecord> {
        match self {
            Self::Wrapped { customers } => customers,
            Self::Bare(customers) => customers,
        }
    }
}

/// Repository for customer persistence
pub struct CustomerRepository {
    path: PathBuf,
    data: RwLock<Vec<CustomerRecord>>,
}

impl CustomerRepository {
    /// Create a new customer repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Load customers from disk
    ///
    /// Date cells are normalized to `YYYY-MM-DD` as they are read.
    pub fn load(&self) -> Result<(), DashboardError> {
        let file_data: CustomerData = read_json(&self.path)?;
        let mut records = file_data.into_records();
        records.iter_mut().for_each(CustomerRecord::normalize_dates);

        let mut data = self.data.write().map_err(|e| {
            DashboardError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        debug!(path = %self.path.display(), count = records.len(), "loaded customers");
        *data = records;

        Ok(())
    }

    /// Save customers to disk
    pub fn save(&self) -> Result<(), DashboardError> {
        let data = self.data.read().map_err(|e| {
            DashboardError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let file_data = CustomerData::Wrapped {
            customers: data.clone(),
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Get a customer by number
    pub fn get(&self, customer_no: &str) -> Result<Option<CustomerRecord>, DashboardError> {
        let data = self.data.read().map_err(|e| {
            DashboardError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.iter().find(|c| c.customer_no == customer_no).cloned())
    }

    /// Get all customers, in snapshot order
    pub fn get_all(&self) -> Result<Vec<CustomerRecord>, DashboardError> {
        let data = self.data.read().map_err(|e| {
            DashboardError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.clone())
    }

    /// Check whether a customer number is taken
    pub fn contains(&self, customer_no: &str) -> Result<bool, DashboardError> {
        Ok(self.get(customer_no)?.is_some())
    }

    /// Insert or update a customer
    ///
    /// An existing record with the same number is replaced in place; new
    /// numbers are appended. Returns true when the record was new.
    pub fn upsert(&self, record: CustomerRecord) -> Result<bool, DashboardError> {
        let mut data = self.data.write().map_err(|e| {
            DashboardError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        match data.iter_mut().find(|c| c.customer_no == record.customer_no) {
            Some(existing) => {
                *existing = record;
                Ok(false)
            }
            None => {
                data.push(record);
                Ok(true)
            }
        }
    }

    /// The next free `C-NNNNN` number
    pub fn next_customer_no(&self) -> Result<String, DashboardError> {
        let data = self.data.read().map_err(|e| {
            DashboardError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let highest = data
            .iter()
            .filter_map(|c| c.customer_no.strip_prefix(CUSTOMER_NO_PREFIX))
            .filter_map(|n| n.parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        let next = highest.checked_add(1).ok_or_else(|| {
            DashboardError::Storage(format!(
                "No customer number left after {}{}",
                CUSTOMER_NO_PREFIX, highest
            ))
        })?;
        Ok(format!("{}{:05}", CUSTOMER_NO_PREFIX, next))
    }

    /// Count customers
    pub fn count(&self) -> Result<usize, DashboardError> {
        let data = self.data.read().map_err(|e| {
            DashboardError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.len())
    }
}
