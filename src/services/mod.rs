//! Service layer for the KCC dashboard
//!
//! The service layer provides business logic on top of the storage layer:
//! status classification, period filtering, the customer list and editor,
//! and spreadsheet import.

pub mod classifier;
pub mod customer;
pub mod import;
pub mod period;

pub use classifier::Classifier;
pub use customer::{CustomerService, DrillDown, ListFilter};
pub use import::{ImportResult, ImportService};
pub use period::PeriodService;
