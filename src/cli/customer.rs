//! CLI commands for customers
//!
//! The filtered list with dashboard drill-downs, record lookup, status
//! breakdowns and the `key=value` record editor.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;

use super::{create_output, OutputFormat};
use crate::config::settings::Settings;
use crate::display::{format_classification, format_customer_details, format_customer_list};
use crate::error::{DashboardError, DashboardResult};
use crate::export::{export_customers_csv, export_customers_json, export_report_yaml, CustomerExport};
use crate::models::{Cohort, CustomerRecord, TaskKind};
use crate::services::customer::parse_assignments;
use crate::services::{Classifier, CustomerService, DrillDown, ListFilter, PeriodService};
use crate::storage::Storage;

/// Customer list arguments
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Registration period: all, 2025, 2025-03, this-month or 6m
    #[arg(short, long)]
    pub period: Option<String>,

    /// Drill into a performance cohort (total, done, complete, progress, cancel)
    #[arg(long, conflicts_with = "task")]
    pub cohort: Option<String>,

    /// Drill into a task queue (e.g. deposit_missing, esign_pending)
    #[arg(long)]
    pub task: Option<String>,

    /// Exact branch
    #[arg(long)]
    pub branch: Option<String>,

    /// Exact inflow channel
    #[arg(long)]
    pub channel: Option<String>,

    /// Exact payment method
    #[arg(long)]
    pub pay: Option<String>,

    /// Exact e-signature status
    #[arg(long)]
    pub esign: Option<String>,

    /// Exact subscription approval
    #[arg(long)]
    pub sub_approve: Option<String>,

    /// Exact installment partner feedback
    #[arg(long)]
    pub hankae: Option<String>,

    /// Search name, phone, customer number and address
    #[arg(short, long)]
    pub query: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ListArgs {
    fn drill_down(&self) -> DashboardResult<Option<DrillDown>> {
        if let Some(key) = &self.cohort {
            let cohort = Cohort::from_key(key).ok_or_else(|| {
                DashboardError::Validation(format!("Unknown cohort: '{}'", key))
            })?;
            return Ok(Some(DrillDown::Cohort(cohort)));
        }
        if let Some(key) = &self.task {
            let task = TaskKind::from_key(key).ok_or_else(|| {
                DashboardError::Validation(format!("Unknown task: '{}'", key))
            })?;
            return Ok(Some(DrillDown::Task(task)));
        }
        Ok(None)
    }

    fn to_filter(&self, settings: &Settings) -> DashboardResult<ListFilter> {
        let periods = PeriodService::new(settings);
        let period = periods.parse_or(self.period.as_deref(), periods.list_default())?;

        let mut filter = ListFilter::for_period(period);
        filter.drill_down = self.drill_down()?;
        filter.branch = self.branch.clone();
        filter.inflow_channel = self.channel.clone();
        filter.pay_method = self.pay.clone();
        filter.esign_status = self.esign.clone();
        filter.sub_approve = self.sub_approve.clone();
        filter.hankae_feedback = self.hankae.clone();
        filter.query = self.query.clone();
        Ok(filter)
    }
}

/// Handle the list command
pub fn handle_list_command(
    storage: &Storage,
    settings: &Settings,
    classifier: &Classifier,
    args: ListArgs,
) -> DashboardResult<()> {
    let filter = args.to_filter(settings)?;
    let customers = CustomerService::new(storage).list(&filter, classifier)?;
    let banner = filter.drill_down.map(|d| d.label());

    match &args.output {
        Some(path) => {
            let mut writer = create_output(path)?;
            write_list(&customers, banner.as_deref(), args.format, &mut writer)?;
            writer
                .flush()
                .map_err(|e| DashboardError::Export(e.to_string()))?;
            println!("{} customer(s) exported to: {}", customers.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_list(&customers, banner.as_deref(), args.format, &mut handle)?;
        }
    }

    Ok(())
}

fn write_list<W: Write>(
    customers: &[CustomerRecord],
    banner: Option<&str>,
    format: OutputFormat,
    writer: &mut W,
) -> DashboardResult<()> {
    match format {
        OutputFormat::Text => write!(writer, "{}", format_customer_list(customers, banner))
            .map_err(|e| DashboardError::Export(e.to_string())),
        OutputFormat::Csv => export_customers_csv(customers, writer),
        OutputFormat::Json => export_customers_json(customers, writer),
        OutputFormat::Yaml => {
            export_report_yaml("customers", &CustomerExport::new(customers), writer)
        }
    }
}

/// Handle the show command
pub fn handle_show_command(
    storage: &Storage,
    classifier: &Classifier,
    customer_no: &str,
) -> DashboardResult<()> {
    let record = CustomerService::new(storage).require(customer_no)?;
    print!("{}", format_customer_details(&record, classifier));
    Ok(())
}

/// Handle the classify command
pub fn handle_classify_command(
    storage: &Storage,
    classifier: &Classifier,
    customer_no: &str,
) -> DashboardResult<()> {
    let record = CustomerService::new(storage).require(customer_no)?;
    let statuses = classifier.classify(&record);
    print!("{}", format_classification(&record, &statuses));
    Ok(())
}

/// Handle the add command
pub fn handle_add_command(storage: &Storage, assignments: &[String]) -> DashboardResult<()> {
    let fields = parse_assignments(assignments)?;
    let record = CustomerService::new(storage).create(&fields)?;
    println!(
        "Created customer: {} ({})",
        record.display_name(),
        record.customer_no
    );
    Ok(())
}

/// Handle the edit command
pub fn handle_edit_command(
    storage: &Storage,
    customer_no: &str,
    assignments: &[String],
) -> DashboardResult<()> {
    let fields = parse_assignments(assignments)?;
    if fields.is_empty() {
        println!("No changes specified.");
        return Ok(());
    }
    let record = CustomerService::new(storage).update(customer_no, &fields)?;
    println!(
        "Updated customer: {} ({})",
        record.display_name(),
        record.customer_no
    );
    Ok(())
}
