//! CLI command for the dashboard report

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;

use super::{create_output, OutputFormat};
use crate::config::settings::Settings;
use crate::error::{DashboardError, DashboardResult};
use crate::export::{export_report_json, export_report_yaml};
use crate::reports::DashboardReport;
use crate::services::{Classifier, PeriodService};
use crate::storage::Storage;

/// Dashboard arguments
#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Registration period: all, 2025, 2025-03, this-month or 6m
    #[arg(short, long)]
    pub period: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle the dashboard command
pub fn handle_dashboard_command(
    storage: &Storage,
    settings: &Settings,
    classifier: &Classifier,
    args: DashboardArgs,
) -> DashboardResult<()> {
    let periods = PeriodService::new(settings);
    let period = periods.parse_or(args.period.as_deref(), periods.dashboard_default())?;
    let report = DashboardReport::generate(storage, period, classifier)?;

    match &args.output {
        Some(path) => {
            let mut writer = create_output(path)?;
            write_report(&report, settings, args.format, &mut writer)?;
            writer
                .flush()
                .map_err(|e| DashboardError::Export(e.to_string()))?;
            println!("Dashboard exported to: {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_report(&report, settings, args.format, &mut handle)?;
        }
    }

    Ok(())
}

fn write_report<W: Write>(
    report: &DashboardReport,
    settings: &Settings,
    format: OutputFormat,
    writer: &mut W,
) -> DashboardResult<()> {
    match format {
        OutputFormat::Text => write!(writer, "{}", report.format_terminal(&settings.currency_symbol))
            .map_err(|e| DashboardError::Export(e.to_string())),
        OutputFormat::Csv => report.export_csv(writer),
        OutputFormat::Json => export_report_json(report, writer),
        OutputFormat::Yaml => export_report_yaml("dashboard", report, writer),
    }
}
