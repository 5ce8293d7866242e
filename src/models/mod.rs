//! Core data models for the KCC dashboard
//!
//! This module contains the customer record as delivered by the snapshot
//! source, the lenient money/date readers used on its cells, registration
//! periods, and the status/cohort/task vocabulary of the dashboard.

pub mod customer;
pub mod date;
pub mod money;
pub mod period;
pub mod status;

pub use customer::{is_blank, CustomerRecord, DATE_FIELDS, FIELD_KEYS, MONEY_FIELDS};
pub use date::{format_date, parse_date};
pub use money::{to_number, Won};
pub use period::{PeriodFilter, PeriodMatch, PeriodMode};
pub use status::{Cohort, Status, TaskKind};
