//! Dashboard Report
//!
//! Performance, revenue and follow-up task figures for one registration
//! period. Cohorts are built from the signed subset of the period except
//! the cancel cohort, which is taken from the whole period since a contract
//! can be cancelled before it is ever signed.

use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::error::{DashboardError, DashboardResult};
use crate::models::{to_number, Cohort, CustomerRecord, PeriodFilter, Status, TaskKind, Won};
use crate::services::classifier::Classifier;
use crate::services::period::filter_by_period;
use crate::storage::Storage;

/// A figure split by payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Breakdown<T> {
    pub total: T,
    pub cash: T,
    pub subscription: T,
}

/// Counts and revenue of one cohort
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CohortSummary {
    pub cohort: Cohort,
    pub label: &'static str,
    pub counts: Breakdown<usize>,
    pub revenue_label: &'static str,
    pub revenue: Breakdown<Won>,
}

/// Size of one follow-up task queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskCount {
    pub task: TaskKind,
    pub title: &'static str,
    pub count: usize,
}

/// Cohort and task figures over a base set of records
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    pub cohorts: Vec<CohortSummary>,
    pub tasks: Vec<TaskCount>,
}

impl Aggregate {
    /// Look up a cohort's summary
    pub fn cohort(&self, cohort: Cohort) -> Option<&CohortSummary> {
        self.cohorts.iter().find(|s| s.cohort == cohort)
    }

    /// Look up a task queue's size
    pub fn task(&self, task: TaskKind) -> usize {
        self.tasks
            .iter()
            .find(|t| t.task == task)
            .map(|t| t.count)
            .unwrap_or(0)
    }
}

/// The members of a cohort, in input order
pub fn cohort_members<'a>(
    cohort: Cohort,
    base: &[&'a CustomerRecord],
    classifier: &Classifier,
) -> Vec<&'a CustomerRecord> {
    match cohort.status() {
        None => base.to_vec(),
        Some(status) if cohort.requires_signature() => {
            let signed = classifier.select(Status::Signed, base);
            classifier.select(status, &signed)
        }
        Some(status) => classifier.select(status, base),
    }
}

fn summarize(
    cohort: Cohort,
    members: &[&CustomerRecord],
    classifier: &Classifier,
) -> CohortSummary {
    let mut counts = Breakdown::<usize>::default();
    let mut revenue = Breakdown::<Won>::default();

    for record in members {
        let quote = Won::new(to_number(&record.final_quote));
        counts.total += 1;
        revenue.total += quote;
        if classifier.is(Status::Subscription, record) {
            counts.subscription += 1;
            revenue.subscription += quote;
        } else {
            counts.cash += 1;
            revenue.cash += quote;
        }
    }

    CohortSummary {
        cohort,
        label: cohort.label(),
        counts,
        revenue_label: cohort.revenue_label(),
        revenue,
    }
}

/// Group a filtered base set into cohorts and task queues
pub fn aggregate(base: &[&CustomerRecord], classifier: &Classifier) -> Aggregate {
    let cohorts = Cohort::ALL
        .into_iter()
        .map(|cohort| {
            let members = cohort_members(cohort, base, classifier);
            summarize(cohort, &members, classifier)
        })
        .collect();

    let tasks = TaskKind::ALL
        .into_iter()
        .map(|task| TaskCount {
            task,
            title: task.title(),
            count: classifier.count(task.status(), base),
        })
        .collect();

    Aggregate { cohorts, tasks }
}

/// Dashboard Report
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    /// Registration period shown
    pub period: PeriodFilter,
    /// Reference date the period and statuses were resolved against
    pub today: NaiveDate,
    /// Cohort and task figures
    #[serde(flatten)]
    pub aggregate: Aggregate,
}

impl DashboardReport {
    /// Generate the dashboard from stored customers
    pub fn generate(
        storage: &Storage,
        period: PeriodFilter,
        classifier: &Classifier,
    ) -> DashboardResult<Self> {
        let records = storage.customers.get_all()?;
        Ok(Self::from_records(&records, period, classifier))
    }

    /// Generate the dashboard from a record snapshot
    pub fn from_records(
        records: &[CustomerRecord],
        period: PeriodFilter,
        classifier: &Classifier,
    ) -> Self {
        let base = filter_by_period(records, &period, classifier.today());
        let aggregate = aggregate(&base, classifier);
        debug!(
            period = %period,
            base = base.len(),
            "generated dashboard"
        );
        Self {
            period,
            today: classifier.today(),
            aggregate,
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Dashboard: {} (as of {})\n",
            self.period, self.today
        ));
        output.push_str(&"=".repeat(64));
        output.push('\n');

        output.push_str(&format!(
            "{:<16} {:>8} {:>8} {:>8}\n",
            "Performance", "Total", "Cash", "Subs"
        ));
        output.push_str(&"-".repeat(64));
        output.push('\n');
        for summary in &self.aggregate.cohorts {
            output.push_str(&format!(
                "{:<16} {:>8} {:>8} {:>8}\n",
                summary.label,
                summary.counts.total,
                summary.counts.cash,
                summary.counts.subscription
            ));
        }

        output.push('\n');
        output.push_str(&format!(
            "{:<16} {:>18} {:>14} {:>14}\n",
            "Revenue", "Total", "Cash", "Subs"
        ));
        output.push_str(&"-".repeat(64));
        output.push('\n');
        for summary in &self.aggregate.cohorts {
            output.push_str(&format!(
                "{:<16} {:>18} {:>14} {:>14}\n",
                summary.revenue_label,
                summary.revenue.total.format_with_symbol(currency_symbol),
                summary.revenue.cash,
                summary.revenue.subscription
            ));
        }

        output.push('\n');
        output.push_str("Tasks\n");
        output.push_str(&"-".repeat(64));
        output.push('\n');
        for task in &self.aggregate.tasks {
            output.push_str(&format!(
                "{:<24} {:>6}   ({})\n",
                task.title,
                task.count,
                task.task.key()
            ));
        }

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> DashboardResult<()> {
        writeln!(writer, "Section,Key,Label,Total,Cash,Subscription")
            .map_err(|e| DashboardError::Export(e.to_string()))?;

        for summary in &self.aggregate.cohorts {
            writeln!(
                writer,
                "count,{},{},{},{},{}",
                summary.cohort.key(),
                summary.label,
                summary.counts.total,
                summary.counts.cash,
                summary.counts.subscription
            )
            .map_err(|e| DashboardError::Export(e.to_string()))?;
        }

        for summary in &self.aggregate.cohorts {
            writeln!(
                writer,
                "revenue,{},{},{},{},{}",
                summary.cohort.key(),
                summary.revenue_label,
                summary.revenue.total.amount(),
                summary.revenue.cash.amount(),
                summary.revenue.subscription.amount()
            )
            .map_err(|e| DashboardError::Export(e.to_string()))?;
        }

        for task in &self.aggregate.tasks {
            writeln!(writer, "task,{},{},{},,", task.task.key(), task.title, task.count)
                .map_err(|e| DashboardError::Export(e.to_string()))?;
        }

        Ok(())
    }
}
