//! JSON file I/O for the customer snapshot
//!
//! Writes go through a sibling temp file and a rename so a crash never
//! leaves a half-written snapshot behind.

use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::trace;

use crate::error::DashboardError;

fn storage_error(action: &str, path: &Path, err: impl Display) -> DashboardError {
    DashboardError::Storage(format!("Failed to {} {}: {}", action, path.display(), err))
}

/// Temp file used while a snapshot is being replaced
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Read JSON from a file, or `T::default()` when the file is missing
pub fn read_json<T, P>(path: P) -> Result<T, DashboardError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        trace!(path = %path.display(), "no file yet, using default");
        return Ok(T::default());
    }

    let file = File::open(path).map_err(|e| storage_error("open", path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| storage_error("parse", path, e))
}

/// Write pretty JSON to a file atomically
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), DashboardError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| storage_error("create directory", parent, e))?;
    }

    let temp_path = temp_path_for(path);
    let result = write_and_sync(&temp_path, data).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|e| storage_error("replace", path, e))
    });
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_and_sync<T: Serialize>(temp_path: &Path, data: &T) -> Result<(), DashboardError> {
    let file = File::create(temp_path).map_err(|e| storage_error("create", temp_path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| storage_error("serialize into", temp_path, e))?;
    writer
        .flush()
        .map_err(|e| storage_error("flush", temp_path, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| storage_error("sync", temp_path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct Snapshot {
        customers: Vec<String>,
    }

    fn sample() -> Snapshot {
        Snapshot {
            customers: vec!["C-00001".into(), "C-00002".into()],
        }
    }

    #[test]
    fn test_read_missing_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("customers.json");

        let data: Snapshot = read_json(&path).unwrap();
        assert_eq!(data, Snapshot::default());
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("customers.json");

        write_json_atomic(&path, &sample()).unwrap();
        let loaded: Snapshot = read_json(&path).unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("customers.json");

        write_json_atomic(&path, &sample()).unwrap();
        assert!(path.exists());
        assert!(!temp_path_for(&path).exists());
        assert!(temp_path_for(&path).ends_with("customers.json.tmp"));
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("nested").join("customers.json");

        write_json_atomic(&path, &sample()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_read_invalid_json_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "not json at all").unwrap();

        let err = read_json::<Snapshot, _>(&path).unwrap_err();
        assert!(matches!(err, DashboardError::Storage(_)));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_overwrite_replaces_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("customers.json");

        write_json_atomic(&path, &sample()).unwrap();
        let second = Snapshot {
            customers: vec!["C-00009".into()],
        };
        write_json_atomic(&path, &second).unwrap();

        let loaded: Snapshot = read_json(&path).unwrap();
        assert_eq!(loaded, second);
    }
}
