use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, FromRow, Row};

/// One biodigester reading as stored by the ingestion side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub energy_generated: Option<f64>,
    pub waste_processed: Option<f64>,
    pub tax_savings: Option<f64>,
    /// Percentage in 0..=100.
    pub efficiency: Option<f64>,
    pub measured_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl IndicatorRow {
    /// Timestamp used for display and bucketing: `measured_at`, else `created_at`.
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        self.measured_at.or(self.created_at)
    }
}

impl<'r> FromRow<'r, PgRow> for IndicatorRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            energy_generated: row.try_get("energy_generated")?,
            waste_processed: row.try_get("waste_processed")?,
            tax_savings: row.try_get("tax_savings")?,
            efficiency: row.try_get("efficiency")?,
            measured_at: row.try_get("measured_at")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Sums and mean efficiency over a set of rows. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodAggregate {
    pub energy: f64,
    pub waste: f64,
    pub tax: f64,
    /// `None` when no row carried an efficiency value.
    pub avg_efficiency: Option<f64>,
}
