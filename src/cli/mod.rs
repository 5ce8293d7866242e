//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod customer;
pub mod dashboard;
pub mod import;
pub mod schedule;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use clap::ValueEnum;

use crate::error::{DashboardError, DashboardResult};

pub use customer::{
    handle_add_command, handle_classify_command, handle_edit_command, handle_list_command,
    handle_show_command, ListArgs,
};
pub use dashboard::{handle_dashboard_command, DashboardArgs};
pub use import::handle_import_command;
pub use schedule::{handle_calendar_command, handle_timeline_command};

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Terminal table
    #[default]
    Text,
    /// CSV rows
    Csv,
    /// Pretty-printed JSON
    Json,
    /// YAML with a comment header
    Yaml,
}

/// Open an output file for writing
pub(crate) fn create_output(path: &Path) -> DashboardResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        DashboardError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}
