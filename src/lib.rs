//! kcc-dashboard - Customer dashboard for contract and construction follow-up
//!
//! This library classifies customer records by contract, payment and
//! construction progress, narrows them by registration period, and
//! aggregates them into the dashboard's cohort, revenue and task figures.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Customer records, dates, money, periods and status names
//! - `storage`: JSON file storage layer
//! - `services`: Classifier, period filter, customer list/editor, import
//! - `reports`: Dashboard, construction timeline and calendar
//! - `audit`: Audit logging system
//! - `display` / `export`: Terminal formatting and file exports
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use kcc_dashboard::models::PeriodFilter;
//! use kcc_dashboard::reports::DashboardReport;
//! use kcc_dashboard::services::Classifier;
//!
//! let classifier = Classifier::for_today();
//! let report = DashboardReport::from_records(&records, PeriodFilter::last_months(6), &classifier);
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::DashboardError;
