//! Registration-date period service
//!
//! Narrows a record snapshot to the records registered inside a period and
//! supplies the default period when the caller does not name one.

use chrono::NaiveDate;
use tracing::debug;

use crate::config::settings::Settings;
use crate::error::{DashboardError, DashboardResult};
use crate::models::{parse_date, CustomerRecord, PeriodFilter, PeriodMatch, PeriodMode};

/// Keep the records registered inside `period`, in input order
///
/// Records with an unparseable `regDate` never match a rolling window;
/// prefix periods compare the raw text.
pub fn filter_by_period<'a>(
    records: &'a [CustomerRecord],
    period: &PeriodFilter,
    today: NaiveDate,
) -> Vec<&'a CustomerRecord> {
    let matcher = period.resolve(today);
    let kept: Vec<&CustomerRecord> = records.iter().filter(|r| matcher.matches(r)).collect();
    debug!(
        period = %period,
        total = records.len(),
        kept = kept.len(),
        "filtered records by registration period"
    );
    kept
}

/// Selector-parts form of [`filter_by_period`]
///
/// Parameters the mode does not use are ignored.
pub fn filter_by_parts<'a>(
    records: &'a [CustomerRecord],
    mode: PeriodMode,
    year: i32,
    month: u32,
    range_months: u32,
    today: NaiveDate,
) -> Vec<&'a CustomerRecord> {
    let period = PeriodFilter::from_parts(mode, year, month, range_months);
    filter_by_period(records, &period, today)
}

impl PeriodMatch {
    /// Check whether a record's registration date satisfies this match
    pub fn matches(&self, record: &CustomerRecord) -> bool {
        match self {
            Self::Everything => true,
            Self::Prefix(prefix) => record.reg_date.starts_with(prefix.as_str()),
            Self::OnOrAfter(cutoff) => match parse_date(&record.reg_date) {
                Some(date) => date >= *cutoff,
                None => false,
            },
        }
    }
}

/// Service for resolving periods against user preferences
pub struct PeriodService<'a> {
    settings: &'a Settings,
}

impl<'a> PeriodService<'a> {
    /// Create a new period service
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// The period the dashboard shows when none is given
    pub fn dashboard_default(&self) -> PeriodFilter {
        PeriodFilter::last_months(self.settings.dashboard_range_months)
    }

    /// The period the customer list shows when none is given
    pub fn list_default(&self) -> PeriodFilter {
        PeriodFilter::last_months(self.settings.list_range_months)
    }

    /// Parse a period string, falling back to `default`
    pub fn parse_or(&self, period_str: Option<&str>, default: PeriodFilter) -> DashboardResult<PeriodFilter> {
        match period_str {
            Some(s) => PeriodFilter::parse(s)
                .map_err(|e| DashboardError::Validation(format!("Invalid period '{}': {}", s, e))),
            None => Ok(default),
        }
    }
}
