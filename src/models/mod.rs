pub mod dashboard;
pub mod indicator;
pub mod report;

pub use dashboard::{DashboardOverview, DashboardSnapshot, LatestReading, MonthlyPoint};
pub use indicator::{IndicatorRow, PeriodAggregate};
pub use report::{Activity, Report, ReportStats};
