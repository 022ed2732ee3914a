use super::PeriodAggregate;
use serde::{Deserialize, Serialize};

/// Pre-formatted monthly statistics shown in every export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportStats {
    pub waste: String,
    pub energy: String,
    pub efficiency: String,
    pub tax: String,
}

/// One line of the recent-activity log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub date: String,
    pub activity: String,
    pub status: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// Normalized input of every exporter. Built right before an export and dropped after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub generated_at: String,
    pub period_label: String,
    pub stats: ReportStats,
    /// Raw figures behind `stats`, used for typed spreadsheet cells.
    pub totals: PeriodAggregate,
    pub activities: Vec<Activity>,
}
