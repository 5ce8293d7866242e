//! User settings for the KCC dashboard
//!
//! Manages user preferences: default rolling ranges for the dashboard and the
//! customer list, display limits and the default log level.

use serde::{Deserialize, Serialize};

use super::paths::DashboardPaths;
use crate::error::DashboardError;

/// User settings for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Rolling range (months) used by the dashboard when no period is given
    #[serde(default = "default_range_months")]
    pub dashboard_range_months: u32,

    /// Rolling range (months) used by the customer list when no period is given
    #[serde(default = "default_range_months")]
    pub list_range_months: u32,

    /// Currency symbol shown before revenue figures
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Maximum entries shown per month in the construction timeline
    #[serde(default = "default_timeline_limit")]
    pub timeline_limit: usize,

    /// Maximum names shown per day in the construction calendar
    #[serde(default = "default_calendar_cell_limit")]
    pub calendar_cell_limit: usize,

    /// Default tracing filter when neither KCC_LOG nor -v is given
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_range_months() -> u32 {
    6
}

fn default_currency() -> String {
    "₩".to_string()
}

fn default_timeline_limit() -> usize {
    5
}

fn default_calendar_cell_limit() -> usize {
    3
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            dashboard_range_months: default_range_months(),
            list_range_months: default_range_months(),
            currency_symbol: default_currency(),
            timeline_limit: default_timeline_limit(),
            calendar_cell_limit: default_calendar_cell_limit(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &DashboardPaths) -> Result<Self, DashboardError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                DashboardError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                DashboardError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &DashboardPaths) -> Result<(), DashboardError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            DashboardError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            DashboardError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}
