use super::PeriodAggregate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardOverview {
    pub week_label: String,
    pub month_label: String,

    pub week_energy: String,
    pub week_waste: String,
    pub energy_week_delta: String,
    pub waste_week_delta: String,
    pub week_energy_label: String,
    pub week_efficiency: String,

    pub efficiency_current: String,
    pub efficiency_bar_width: String,
    pub efficiency_status: String,

    pub month_energy: String,
    pub month_waste: String,
    pub month_tax: String,

    pub week: PeriodAggregate,
    pub previous_week: PeriodAggregate,
    pub month: PeriodAggregate,
    pub efficiency_value: Option<f64>,
}

/// One month of the trailing-year chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    pub name: String,
    pub waste_processed: f64,
    pub energy_generated: f64,
    pub tax_deduction: f64,
}

/// Headline cards built from the most recent reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatestReading {
    pub energy_generated: f64,
    pub waste_processed: f64,
    pub tax_savings: f64,
    pub energy_display: String,
    pub waste_display: String,
    pub tax_display: String,
    pub observed_at: Option<DateTime<Utc>>,
}

/// What a dashboard stream publishes on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub overview: DashboardOverview,
    pub trend: Vec<MonthlyPoint>,
    pub refreshed_at: Option<DateTime<Utc>>,
}
