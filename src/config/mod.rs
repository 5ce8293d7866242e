//! Configuration module for the KCC dashboard
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence (default period ranges, display limits, logging)

pub mod paths;
pub mod settings;

pub use paths::DashboardPaths;
pub use settings::Settings;
