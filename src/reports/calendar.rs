//! Construction Calendar Report
//!
//! A Sunday-first month grid of fixed construction dates. Days only match
//! records whose `constructDateFix` is exactly that `YYYY-MM-DD`.

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use crate::error::{DashboardError, DashboardResult};
use crate::models::CustomerRecord;
use crate::storage::Storage;

/// One day of the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub day: u32,
    /// Names (or numbers when unnamed) shown in the cell
    pub shown: Vec<String>,
    /// Records scheduled on the day but not shown
    pub overflow: usize,
}

/// Construction Calendar Report
#[derive(Debug, Clone, Serialize)]
pub struct CalendarReport {
    pub year: i32,
    pub month: u32,
    /// Blank cells before the 1st (0 = month starts on Sunday)
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

impl CalendarReport {
    /// Generate the calendar from stored customers
    pub fn generate(
        storage: &Storage,
        year: i32,
        month: u32,
        cell_limit: usize,
    ) -> DashboardResult<Self> {
        let records = storage.customers.get_all()?;
        Self::from_records(&records, year, month, cell_limit)
    }

    /// Generate the calendar from a record snapshot
    pub fn from_records(
        records: &[CustomerRecord],
        year: i32,
        month: u32,
        cell_limit: usize,
    ) -> DashboardResult<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            DashboardError::Validation(format!("Invalid month: {:04}-{:02}", year, month))
        })?;
        let days_in_month = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .map(|last| last.day())
            .unwrap_or(31);

        let days = (1..=days_in_month)
            .map(|day| {
                let date = format!("{:04}-{:02}-{:02}", year, month, day);
                let scheduled: Vec<&CustomerRecord> = records
                    .iter()
                    .filter(|r| r.construct_date_fix == date)
                    .collect();
                CalendarDay {
                    day,
                    shown: scheduled
                        .iter()
                        .take(cell_limit)
                        .map(|r| r.display_name().to_string())
                        .collect(),
                    overflow: scheduled.len().saturating_sub(cell_limit),
                }
            })
            .collect();

        Ok(Self {
            year,
            month,
            leading_blanks: first.weekday().num_days_from_sunday(),
            days,
        })
    }

    /// Heading shown for the month ("2025.06")
    pub fn title(&self) -> String {
        format!("{}.{:02}", self.year, self.month)
    }

    /// Format the report for terminal display
    ///
    /// One line per week; each cell lists the day and how many
    /// constructions it holds, followed by the names scheduled that week.
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n", self.title()));
        output.push_str(" 일    월    화    수    목    금    토\n");

        let mut cells: Vec<Option<&CalendarDay>> = vec![None; self.leading_blanks as usize];
        cells.extend(self.days.iter().map(Some));

        for week in cells.chunks(7) {
            let mut line = String::new();
            let mut names = Vec::new();
            for cell in week {
                match cell {
                    None => line.push_str("      "),
                    Some(day) => {
                        let count = day.shown.len() + day.overflow;
                        if count == 0 {
                            line.push_str(&format!("{:>2}    ", day.day));
                        } else {
                            line.push_str(&format!("{:>2}({}) ", day.day, count.min(9)));
                            let mut label = format!("{}: {}", day.day, day.shown.join(", "));
                            if day.overflow > 0 {
                                label.push_str(&format!(" +{}", day.overflow));
                            }
                            names.push(label);
                        }
                    }
                }
            }
            output.push_str(line.trim_end());
            output.push('\n');
            for label in names {
                output.push_str(&format!("    {}\n", label));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduled(no: &str, name: &str, date: &str) -> CustomerRecord {
        CustomerRecord {
            customer_no: no.into(),
            name: name.into(),
            construct_date_fix: date.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_grid_shape() {
        // June 2025 starts on a Sunday
        let report = CalendarReport::from_records(&[], 2025, 6, 3).unwrap();
        assert_eq!(report.leading_blanks, 0);
        assert_eq!(report.days.len(), 30);

        // February 2024 starts on a Thursday and has 29 days
        let report = CalendarReport::from_records(&[], 2024, 2, 3).unwrap();
        assert_eq!(report.leading_blanks, 4);
        assert_eq!(report.days.len(), 29);
        assert_eq!(report.title(), "2024.02");
    }

    #[test]
    fn test_exact_date_match_with_overflow() {
        let records = vec![
            scheduled("C-00001", "가", "2025-06-10"),
            scheduled("C-00002", "나", "2025-06-10"),
            scheduled("C-00003", "", "2025-06-10"),
            scheduled("C-00004", "라", "2025-06-10"),
            scheduled("C-00005", "마", "2025-06-10T09:00"),
        ];
        let report = CalendarReport::from_records(&records, 2025, 6, 3).unwrap();
        let day = &report.days[9];
        assert_eq!(day.day, 10);
        assert_eq!(day.shown, vec!["가", "나", "C-00003"]);
        assert_eq!(day.overflow, 1);
    }

    #[test]
    fn test_invalid_month() {
        let err = CalendarReport::from_records(&[], 2025, 13, 3).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_format_terminal() {
        let records = vec![scheduled("C-00001", "김철수", "2025-06-03")];
        let output = CalendarReport::from_records(&records, 2025, 6, 3)
            .unwrap()
            .format_terminal();
        assert!(output.starts_with("2025.06\n"));
        assert!(output.contains(" 3(1)"));
        assert!(output.contains("3: 김철수"));
        assert!(output.contains("30"));
    }
}
