//! Export module for the KCC dashboard
//!
//! - CSV: the customer list, in the same column layout the importer reads
//! - JSON: reports and customer lists for other tools
//! - YAML: reports in a human-readable form

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_customers_csv;
pub use json::{export_customers_json, export_report_json, CustomerExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_report_yaml;
