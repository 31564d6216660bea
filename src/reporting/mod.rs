//! Reporting
//!
//! Structured logging, file exports and the static HTML dashboard.

pub mod dashboard;
pub mod export;
pub mod logging;

// Re-export commonly used items
pub use dashboard::{DashboardBody, DashboardData, DashboardError, HtmlDashboard};
pub use export::{ExportData, ExportFormat, export_results};
