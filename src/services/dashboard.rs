use crate::error::Result;
use crate::format;
use crate::models::{
    DashboardOverview, DashboardSnapshot, IndicatorRow, LatestReading, MonthlyPoint,
    PeriodAggregate,
};
use crate::periods::PeriodPlan;
use crate::repositories::{IndicatorFetcher, SortDirection};
use crate::services::aggregate::{aggregate, monthly_trend};
use chrono::{DateTime, TimeZone, Utc};

#[derive(Clone)]
pub struct DashboardService {
    fetcher: IndicatorFetcher,
}

impl DashboardService {
    pub fn new(fetcher: IndicatorFetcher) -> Self {
        Self { fetcher }
    }

    pub async fn overview<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
        owner: Option<&str>,
    ) -> Result<DashboardOverview> {
        let plan = PeriodPlan::anchored_at(now);

        let (week_rows, prev_rows, month_rows, latest) = tokio::try_join!(
            self.fetcher
                .fetch_range(&plan.week, owner, SortDirection::Ascending),
            self.fetcher
                .fetch_range(&plan.previous_week, owner, SortDirection::Ascending),
            self.fetcher
                .fetch_range(&plan.month, owner, SortDirection::Ascending),
            self.fetcher.fetch_latest(owner),
        )?;

        Ok(build_overview(
            &plan,
            aggregate(&week_rows),
            aggregate(&prev_rows),
            aggregate(&month_rows),
            latest.as_ref(),
        ))
    }

    pub async fn trend<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
        owner: Option<&str>,
    ) -> Result<Vec<MonthlyPoint>> {
        let plan = PeriodPlan::anchored_at(now);
        let rows = self
            .fetcher
            .fetch_range(&plan.trailing_year, owner, SortDirection::Ascending)
            .await?;
        Ok(monthly_trend(&rows, &now.timezone()))
    }

    pub async fn latest(&self, owner: Option<&str>) -> Result<LatestReading> {
        let row = self.fetcher.fetch_latest(owner).await?;
        Ok(latest_reading(row.as_ref()))
    }

    pub async fn snapshot<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
        owner: Option<&str>,
    ) -> Result<DashboardSnapshot> {
        let (overview, trend) = tokio::try_join!(self.overview(now, owner), self.trend(now, owner))?;
        Ok(DashboardSnapshot {
            overview,
            trend,
            refreshed_at: Some(now.with_timezone(&Utc)),
        })
    }
}

/// Render aggregates into the dashboard's display strings.
pub fn build_overview(
    plan: &PeriodPlan,
    week: PeriodAggregate,
    previous_week: PeriodAggregate,
    month: PeriodAggregate,
    latest: Option<&IndicatorRow>,
) -> DashboardOverview {
    let efficiency = latest
        .and_then(|row| row.efficiency)
        .or(month.avg_efficiency);

    DashboardOverview {
        week_label: format!(
            "{} - {}",
            format::format_date(plan.week.first_day),
            format::format_date(plan.week.last_day())
        ),
        month_label: format::month_long(plan.month.first_day),

        week_energy: format::format_int(week.energy),
        week_waste: format::format_int(week.waste),
        energy_week_delta: format::format_delta(format::delta(week.energy, previous_week.energy)),
        waste_week_delta: format::format_delta(format::delta(week.waste, previous_week.waste)),
        week_energy_label: format!("{} kWh", format::format_int(week.energy)),
        week_efficiency: format::format_optional_percent(week.avg_efficiency),

        efficiency_current: format::format_optional_percent(efficiency),
        efficiency_bar_width: format::bar_width(efficiency),
        efficiency_status: format::efficiency_status(efficiency).to_string(),

        month_energy: format!("{} kWh", format::format_int(month.energy)),
        month_waste: format!("{} kg", format::format_int(month.waste)),
        month_tax: format::format_currency(month.tax),

        week,
        previous_week,
        month,
        efficiency_value: efficiency,
    }
}

pub fn latest_reading(row: Option<&IndicatorRow>) -> LatestReading {
    let energy = row.and_then(|r| r.energy_generated).unwrap_or(0.0);
    let waste = row.and_then(|r| r.waste_processed).unwrap_or(0.0);
    let tax = row.and_then(|r| r.tax_savings).unwrap_or(0.0);

    LatestReading {
        energy_generated: energy,
        waste_processed: waste,
        tax_savings: tax,
        energy_display: format!("{:.1}", energy),
        waste_display: format!("{:.1}", waste),
        tax_display: format!("R$ {:.2}", tax),
        observed_at: row.and_then(IndicatorRow::observed_at),
    }
}

impl DashboardSnapshot {
    /// Zeroed snapshot shown before the first successful refresh.
    pub fn empty<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let plan = PeriodPlan::anchored_at(now);
        let zero = PeriodAggregate::default();
        Self {
            overview: build_overview(&plan, zero, zero, zero, None),
            trend: Vec::new(),
            refreshed_at: None,
        }
    }
}
