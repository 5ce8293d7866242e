//! Display formatting for terminal output
//!
//! Provides utilities for formatting customers for terminal display:
//! list tables, detail views with progress badges and status breakdowns.

pub mod customer;

pub use customer::{
    badges, format_classification, format_customer_details, format_customer_list, Badge,
};
