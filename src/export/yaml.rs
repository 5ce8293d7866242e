//! YAML Export functionality

use std::io::Write;

use serde::Serialize;

use crate::error::{DashboardError, DashboardResult};

/// Export any report as YAML, preceded by a comment header
pub fn export_report_yaml<T: Serialize, W: Write>(
    title: &str,
    report: &T,
    writer: &mut W,
) -> DashboardResult<()> {
    writeln!(writer, "# KCC Dashboard: {}", title)
        .map_err(|e| DashboardError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", chrono::Utc::now().to_rfc3339())
        .map_err(|e| DashboardError::Export(e.to_string()))?;

    serde_yaml::to_writer(&mut *writer, report).map_err(|e| DashboardError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PeriodFilter;
    use crate::reports::DashboardReport;
    use crate::services::classifier::Classifier;
    use chrono::NaiveDate;

    #[test]
    fn test_dashboard_yaml() {
        let classifier = Classifier::new(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
        let report = DashboardReport::from_records(&[], PeriodFilter::All, &classifier);

        let mut buffer = Vec::new();
        export_report_yaml("dashboard", &report, &mut buffer).unwrap();
        let yaml = String::from_utf8(buffer).unwrap();

        assert!(yaml.starts_with("# KCC Dashboard: dashboard\n"));
        assert!(yaml.contains("mode: all"));
        assert!(yaml.contains("cohorts:"));
        assert!(yaml.contains("balance_missing"));
    }
}
