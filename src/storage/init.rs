//! Storage initialization
//!
//! First-run setup: directories, default settings and an empty snapshot.

use tracing::info;

use crate::config::paths::DashboardPaths;
use crate::config::settings::Settings;
use crate::error::DashboardError;

use super::customers::CustomerRepository;

/// Initialize storage for a fresh installation
///
/// Existing settings and customers are left untouched. Returns true when
/// anything was created.
pub fn initialize_storage(paths: &DashboardPaths) -> Result<bool, DashboardError> {
    paths.ensure_directories()?;
    let mut created = false;

    if !paths.settings_file().exists() {
        Settings::default().save(paths)?;
        created = true;
    }

    if !paths.customers_file().exists() {
        CustomerRepository::new(paths.customers_file()).save()?;
        created = true;
    }

    if created {
        info!(base_dir = %paths.base_dir().display(), "initialized dashboard storage");
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CustomerRecord;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_creates_files() {
        let temp_dir = TempDir::new().unwrap();
        let paths = DashboardPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(initialize_storage(&paths).unwrap());
        assert!(paths.settings_file().exists());
        assert!(paths.customers_file().exists());
        assert!(paths.is_initialized());
    }

    #[test]
    fn test_initialize_keeps_existing_customers() {
        let temp_dir = TempDir::new().unwrap();
        let paths = DashboardPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        let repo = CustomerRepository::new(paths.customers_file());
        repo.upsert(CustomerRecord::new("C-00001")).unwrap();
        repo.save().unwrap();

        initialize_storage(&paths).unwrap();
        assert!(!initialize_storage(&paths).unwrap());

        let reloaded = CustomerRepository::new(paths.customers_file());
        reloaded.load().unwrap();
        assert_eq!(reloaded.count().unwrap(), 1);
    }
}
