//! Registration-date periods
//!
//! A period selects records by their `regDate`: everything, one calendar
//! year, one calendar month, or a window relative to the reference date
//! (the current month, or a rolling number of months).

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::date::year_month;

/// The selector kinds exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodMode {
    All,
    Year,
    Month,
    Range,
}

/// A registration-date period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum PeriodFilter {
    /// Every record
    All,
    /// One calendar year (e.g. "2025")
    Year { year: i32 },
    /// One calendar month (e.g. "2025-03")
    Month { year: i32, month: u32 },
    /// `months == 0`: the reference date's month; otherwise a rolling window
    Range { months: u32 },
}

/// How a period narrows records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodMatch {
    /// Keep everything
    Everything,
    /// Keep records whose raw `regDate` starts with this text
    Prefix(String),
    /// Keep records whose parsed `regDate` is on or after this date
    OnOrAfter(NaiveDate),
}

impl PeriodFilter {
    /// Build a period from the selector parts the dashboard controls hold
    ///
    /// Parameters that the mode does not use are ignored.
    pub fn from_parts(mode: PeriodMode, year: i32, month: u32, range_months: u32) -> Self {
        match mode {
            PeriodMode::All => Self::All,
            PeriodMode::Year => Self::Year { year },
            PeriodMode::Month => Self::Month { year, month },
            PeriodMode::Range => Self::Range {
                months: range_months,
            },
        }
    }

    /// The current calendar month relative to the reference date
    pub fn this_month() -> Self {
        Self::Range { months: 0 }
    }

    /// A rolling window of `months` months
    pub fn last_months(months: u32) -> Self {
        Self::Range { months }
    }

    /// Get the selector kind
    pub fn mode(&self) -> PeriodMode {
        match self {
            Self::All => PeriodMode::All,
            Self::Year { .. } => PeriodMode::Year,
            Self::Month { .. } => PeriodMode::Month,
            Self::Range { .. } => PeriodMode::Range,
        }
    }

    /// Resolve the period against a reference date
    pub fn resolve(&self, today: NaiveDate) -> PeriodMatch {
        match *self {
            Self::All => PeriodMatch::Everything,
            Self::Year { year } => PeriodMatch::Prefix(format!("{:04}", year)),
            Self::Month { year, month } => PeriodMatch::Prefix(format!("{:04}-{:02}", year, month)),
            Self::Range { months: 0 } => PeriodMatch::Prefix(year_month(today)),
            Self::Range { months } => {
                let cutoff = today
                    .checked_sub_months(Months::new(months))
                    .unwrap_or(NaiveDate::MIN);
                PeriodMatch::OnOrAfter(cutoff)
            }
        }
    }

    /// Parse a period string
    ///
    /// Formats:
    /// - "all"
    /// - Year: "2025"
    /// - Month: "2025-03"
    /// - Current month: "this-month" (also "current", "0m")
    /// - Rolling window: "6m" (also "last-6")
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        let s = s.trim().to_lowercase();

        match s.as_str() {
            "all" => return Ok(Self::All),
            "this-month" | "current" => return Ok(Self::this_month()),
            _ => {}
        }

        if let Some(n) = s.strip_suffix('m').or_else(|| s.strip_prefix("last-")) {
            let months: u32 = n
                .parse()
                .map_err(|_| PeriodParseError::InvalidFormat(s.clone()))?;
            return Ok(Self::last_months(months));
        }

        let parts: Vec<&str> = s.split('-').collect();
        match parts.as_slice() {
            [year] if year.len() == 4 => {
                let year: i32 = year
                    .parse()
                    .map_err(|_| PeriodParseError::InvalidFormat(s.clone()))?;
                Ok(Self::Year { year })
            }
            [year, month] if year.len() == 4 => {
                let year: i32 = year
                    .parse()
                    .map_err(|_| PeriodParseError::InvalidFormat(s.clone()))?;
                let month: u32 = month
                    .parse()
                    .map_err(|_| PeriodParseError::InvalidFormat(s.clone()))?;
                if !(1..=12).contains(&month) {
                    return Err(PeriodParseError::InvalidMonth(month));
                }
                Ok(Self::Month { year, month })
            }
            _ => Err(PeriodParseError::InvalidFormat(s)),
        }
    }
}

impl fmt::Display for PeriodFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Year { year } => write!(f, "{:04}", year),
            Self::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            Self::Range { months: 0 } => write!(f, "this month"),
            Self::Range { months } => write!(f, "last {} months", months),
        }
    }
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodParseError::InvalidFormat(s) => write!(f, "Invalid period format: {}", s),
            PeriodParseError::InvalidMonth(m) => write!(f, "Invalid month: {}", m),
        }
    }
}

impl std::error::Error for PeriodParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse() {
        assert_eq!(PeriodFilter::parse("all").unwrap(), PeriodFilter::All);
        assert_eq!(
            PeriodFilter::parse("2025").unwrap(),
            PeriodFilter::Year { year: 2025 }
        );
        assert_eq!(
            PeriodFilter::parse("2025-03").unwrap(),
            PeriodFilter::Month {
                year: 2025,
                month: 3
            }
        );
        assert_eq!(
            PeriodFilter::parse("this-month").unwrap(),
            PeriodFilter::this_month()
        );
        assert_eq!(
            PeriodFilter::parse("6m").unwrap(),
            PeriodFilter::last_months(6)
        );
        assert_eq!(
            PeriodFilter::parse("last-12").unwrap(),
            PeriodFilter::last_months(12)
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            PeriodFilter::parse("2025-13"),
            Err(PeriodParseError::InvalidMonth(13))
        );
        assert!(PeriodFilter::parse("soon").is_err());
        assert!(PeriodFilter::parse("xm").is_err());
        assert!(PeriodFilter::parse("25").is_err());
    }

    #[test]
    fn test_resolve_prefixes() {
        let today = d(2025, 6, 15);
        assert_eq!(
            PeriodFilter::Month {
                year: 2025,
                month: 3
            }
            .resolve(today),
            PeriodMatch::Prefix("2025-03".into())
        );
        assert_eq!(
            PeriodFilter::Year { year: 2024 }.resolve(today),
            PeriodMatch::Prefix("2024".into())
        );
        assert_eq!(
            PeriodFilter::this_month().resolve(today),
            PeriodMatch::Prefix("2025-06".into())
        );
        assert_eq!(PeriodFilter::All.resolve(today), PeriodMatch::Everything);
    }

    #[test]
    fn test_resolve_rolling_window() {
        assert_eq!(
            PeriodFilter::last_months(6).resolve(d(2025, 6, 15)),
            PeriodMatch::OnOrAfter(d(2024, 12, 15))
        );
        // Day clamps to the end of the shorter month
        assert_eq!(
            PeriodFilter::last_months(1).resolve(d(2025, 3, 31)),
            PeriodMatch::OnOrAfter(d(2025, 2, 28))
        );
    }

    #[test]
    fn test_rolling_window_clamps_month_end() {
        // One month before March 31st is the last day of February
        let today = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        assert_eq!(
            PeriodFilter::last_months(1).resolve(today),
            PeriodMatch::OnOrAfter(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap())
        );

        let leap = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
        assert_eq!(
            PeriodFilter::last_months(3).resolve(leap),
            PeriodMatch::OnOrAfter(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
        );
    }

    #[test]
    fn test_from_parts() {
        assert_eq!(
            PeriodFilter::from_parts(PeriodMode::Month, 2025, 1, 9),
            PeriodFilter::Month {
                year: 2025,
                month: 1
            }
        );
        assert_eq!(
            PeriodFilter::from_parts(PeriodMode::Range, 2025, 1, 3).mode(),
            PeriodMode::Range
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(PeriodFilter::Month { year: 2025, month: 1 }.to_string(), "2025-01");
        assert_eq!(PeriodFilter::last_months(3).to_string(), "last 3 months");
        assert_eq!(PeriodFilter::this_month().to_string(), "this month");
    }
}
