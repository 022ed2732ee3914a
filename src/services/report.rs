use crate::error::Result;
use crate::format;
use crate::models::{Activity, IndicatorRow, Report, ReportStats};
use crate::periods::PeriodPlan;
use crate::repositories::{IndicatorFetcher, SortDirection};
use crate::services::aggregate::aggregate;
use chrono::{DateTime, TimeZone};

const ACTIVITY_STATUS: &str = "Registrado";

/// Assembles the monthly report every exporter consumes.
#[derive(Clone)]
pub struct ReportBuilder {
    fetcher: IndicatorFetcher,
    title: String,
    activity_limit: usize,
}

impl ReportBuilder {
    pub fn new(fetcher: IndicatorFetcher, title: impl Into<String>, activity_limit: usize) -> Self {
        Self {
            fetcher,
            title: title.into(),
            activity_limit,
        }
    }

    /// Fetch this month (stats) and this week (activity log) and build a report.
    ///
    /// A supplied, non-empty `activities` list replaces the fetched log. Either
    /// fetch failing fails the whole build.
    pub async fn build<Tz>(
        &self,
        now: &DateTime<Tz>,
        owner: Option<&str>,
        activities: Option<Vec<Activity>>,
    ) -> Result<Report>
    where
        Tz: TimeZone,
    {
        let plan = PeriodPlan::anchored_at(now);

        let (month_rows, week_rows) = tokio::try_join!(
            self.fetcher
                .fetch_range(&plan.month, owner, SortDirection::Ascending),
            self.fetcher
                .fetch_range(&plan.week, owner, SortDirection::Descending),
        )?;

        let tz = now.timezone();
        let activities = match activities {
            Some(list) if !list.is_empty() => list,
            _ => week_rows
                .iter()
                .take(self.activity_limit)
                .map(|row| activity_line(row, &tz))
                .collect(),
        };

        let totals = aggregate(&month_rows);
        Ok(Report {
            title: self.title.clone(),
            generated_at: format::format_date(plan.today),
            period_label: format!(
                "{} — {}",
                format::format_date(plan.month.first_day),
                format::format_date(plan.month.last_day())
            ),
            stats: ReportStats {
                waste: format!("{} kg", format::format_int(totals.waste)),
                energy: format!("{} kWh", format::format_int(totals.energy)),
                efficiency: format::format_optional_percent(totals.avg_efficiency),
                tax: format::format_currency(totals.tax),
            },
            totals,
            activities,
        })
    }
}

/// One-line summary of a reading for the activity log.
pub fn activity_line<Tz: TimeZone>(row: &IndicatorRow, tz: &Tz) -> Activity {
    let date = row
        .observed_at()
        .map(|ts| format::format_date(ts.with_timezone(tz).date_naive()))
        .unwrap_or_default();

    Activity {
        date,
        activity: format!(
            "Energia: {} kWh • Resíduos: {} kg",
            format::format_int(row.energy_generated.unwrap_or(0.0)),
            format::format_int(row.waste_processed.unwrap_or(0.0))
        ),
        status: ACTIVITY_STATUS.to_string(),
        value: Some(
            row.tax_savings
                .map(format::format_currency)
                .unwrap_or_default(),
        ),
    }
}
