//! Construction Timeline Report
//!
//! Fixed construction dates for the previous, current and next month
//! around the reference date, taken from the whole snapshot.

use std::io::Write;

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use crate::error::{DashboardError, DashboardResult};
use crate::models::CustomerRecord;
use crate::storage::Storage;

/// One scheduled construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub customer_no: String,
    pub name: String,
    pub address: String,
    /// Raw `constructDateFix` cell
    pub construct_date: String,
}

impl TimelineEntry {
    fn from_record(record: &CustomerRecord) -> Self {
        Self {
            customer_no: record.customer_no.clone(),
            name: record.name.clone(),
            address: record.address.clone(),
            construct_date: record.construct_date_fix.clone(),
        }
    }

    /// Day-of-month part of the date ("07"), empty when the cell is short
    pub fn day(&self) -> &str {
        self.construct_date.get(8..10).unwrap_or("")
    }
}

/// Constructions scheduled in one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineMonth {
    pub year: i32,
    pub month: u32,
    /// Earliest entries, up to the display limit
    pub entries: Vec<TimelineEntry>,
    /// Every matching record, including those past the limit
    pub total: usize,
}

impl TimelineMonth {
    /// "YYYY-MM" prefix matched against `constructDateFix`
    pub fn prefix(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Heading shown for the month ("2025.6")
    pub fn title(&self) -> String {
        format!("{}.{}", self.year, self.month)
    }
}

/// Construction Timeline Report
#[derive(Debug, Clone, Serialize)]
pub struct TimelineReport {
    pub today: NaiveDate,
    /// Previous, current and next month
    pub months: Vec<TimelineMonth>,
}

impl TimelineReport {
    /// Generate the timeline from stored customers
    pub fn generate(storage: &Storage, today: NaiveDate, limit: usize) -> DashboardResult<Self> {
        let records = storage.customers.get_all()?;
        Ok(Self::from_records(&records, today, limit))
    }

    /// Generate the timeline from a record snapshot
    pub fn from_records(records: &[CustomerRecord], today: NaiveDate, limit: usize) -> Self {
        let first = today.with_day(1).unwrap_or(today);
        let months = [
            first.checked_sub_months(Months::new(1)),
            Some(first),
            first.checked_add_months(Months::new(1)),
        ]
        .into_iter()
        .flatten()
        .map(|start| month_of(records, start.year(), start.month(), limit))
        .collect();

        Self { today, months }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("Construction Timeline (as of {})\n", self.today));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        for month in &self.months {
            output.push_str(&format!("\n{} ({})\n", month.title(), month.total));
            if month.entries.is_empty() {
                output.push_str("  일정 없음\n");
                continue;
            }
            for entry in &month.entries {
                output.push_str(&format!(
                    "  {:>2}일  {:<10} {:<12} {}\n",
                    entry.day(),
                    entry.customer_no,
                    entry.name,
                    entry.address
                ));
            }
            if month.total > month.entries.len() {
                output.push_str(&format!(
                    "  ... +{} more\n",
                    month.total - month.entries.len()
                ));
            }
        }

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> DashboardResult<()> {
        writeln!(writer, "Month,Construct Date,Customer No,Name,Address")
            .map_err(|e| DashboardError::Export(e.to_string()))?;
        for month in &self.months {
            for entry in &month.entries {
                writeln!(
                    writer,
                    "{},{},{},{},\"{}\"",
                    month.prefix(),
                    entry.construct_date,
                    entry.customer_no,
                    entry.name,
                    entry.address.replace('"', "\"\"")
                )
                .map_err(|e| DashboardError::Export(e.to_string()))?;
            }
        }
        Ok(())
    }
}

fn month_of(records: &[CustomerRecord], year: i32, month: u32, limit: usize) -> TimelineMonth {
    let prefix = format!("{:04}-{:02}", year, month);
    let mut scheduled: Vec<&CustomerRecord> = records
        .iter()
        .filter(|r| r.construct_date_fix.starts_with(&prefix))
        .collect();
    scheduled.sort_by(|a, b| a.construct_date_fix.cmp(&b.construct_date_fix));

    TimelineMonth {
        year,
        month,
        total: scheduled.len(),
        entries: scheduled
            .into_iter()
            .take(limit)
            .map(TimelineEntry::from_record)
            .collect(),
    }
}
