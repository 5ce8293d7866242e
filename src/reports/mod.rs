//! Reports module for the KCC dashboard
//!
//! Provides the dashboard (performance, revenue and task figures) and the
//! construction schedule views.

pub mod calendar;
pub mod dashboard;
pub mod timeline;

pub use calendar::{CalendarDay, CalendarReport};
pub use dashboard::{Aggregate, Breakdown, CohortSummary, DashboardReport, TaskCount};
pub use timeline::{TimelineEntry, TimelineMonth, TimelineReport};
