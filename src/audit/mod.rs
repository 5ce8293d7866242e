//! Audit trail for customer edits
//!
//! Every create, update and import is appended to `audit.log` as one JSON
//! line holding the record before and after the change plus a short field
//! diff, so edits made from the terminal can be traced later.

mod diff;
mod entry;
mod logger;

pub use diff::{changed_fields, generate_diff};
pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
