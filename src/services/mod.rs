pub mod aggregate;
pub mod dashboard;
pub mod export;
pub mod refresh;
pub mod report;

pub use dashboard::DashboardService;
pub use export::{ExportFailure, ExportRequest, ExportService};
pub use refresh::{DashboardRefresher, RefreshHandle};
pub use report::ReportBuilder;
