//! CLI commands for the construction schedule

use std::io::Write;
use std::path::PathBuf;

use chrono::Datelike;

use super::create_output;
use crate::config::settings::Settings;
use crate::error::{DashboardError, DashboardResult};
use crate::reports::{CalendarReport, TimelineReport};
use crate::services::Classifier;
use crate::storage::Storage;

/// Handle the timeline command
pub fn handle_timeline_command(
    storage: &Storage,
    settings: &Settings,
    classifier: &Classifier,
    output: Option<PathBuf>,
) -> DashboardResult<()> {
    let report = TimelineReport::generate(storage, classifier.today(), settings.timeline_limit)?;

    match output {
        Some(path) => {
            let mut writer = create_output(&path)?;
            report.export_csv(&mut writer)?;
            writer
                .flush()
                .map_err(|e| DashboardError::Export(e.to_string()))?;
            println!("Timeline exported to: {}", path.display());
        }
        None => print!("{}", report.format_terminal()),
    }

    Ok(())
}

/// Handle the calendar command
///
/// `month` is `YYYY-MM`; the reference date's month is used when absent.
pub fn handle_calendar_command(
    storage: &Storage,
    settings: &Settings,
    classifier: &Classifier,
    month: Option<&str>,
) -> DashboardResult<()> {
    let (year, month) = match month {
        Some(s) => parse_month(s)?,
        None => (classifier.today().year(), classifier.today().month()),
    };

    let report = CalendarReport::generate(storage, year, month, settings.calendar_cell_limit)?;
    print!("{}", report.format_terminal());

    Ok(())
}

fn parse_month(s: &str) -> DashboardResult<(i32, u32)> {
    let invalid = || DashboardError::Validation(format!("Expected YYYY-MM, got '{}'", s));
    let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}
