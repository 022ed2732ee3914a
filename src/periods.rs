//! Canonical date ranges anchored to "now".
//!
//! All boundaries fall on local midnight of the zone carried by `now`, and
//! every range is half-open: `from` inclusive, `to` exclusive.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;

/// Half-open `[from, to)` interval plus the local days it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub first_day: NaiveDate,
    /// Exclusive end day.
    pub end_day: NaiveDate,
}

impl DateRange {
    fn local<Tz: TimeZone>(tz: &Tz, first_day: NaiveDate, end_day: NaiveDate) -> Self {
        Self {
            from: local_midnight(tz, first_day),
            to: local_midnight(tz, end_day),
            first_day,
            end_day,
        }
    }

    /// Last day inside the range.
    pub fn last_day(&self) -> NaiveDate {
        self.end_day.pred_opt().unwrap_or(self.end_day)
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.from && ts < self.to
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodPlan {
    pub today: NaiveDate,
    /// The seven days ending today.
    pub week: DateRange,
    /// The seven days immediately before `week`.
    pub previous_week: DateRange,
    pub month: DateRange,
    /// Twelve calendar months ending with the current one.
    pub trailing_year: DateRange,
}

impl PeriodPlan {
    pub fn anchored_at<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();

        let week_end = add_days(today, 1);
        let week_start = sub_days(today, 6);
        let prev_week_start = sub_days(week_start, 7);

        let month_start = first_of_month(today);
        let next_month = month_start
            .checked_add_months(Months::new(1))
            .unwrap_or(month_start);
        let year_start = month_start
            .checked_sub_months(Months::new(11))
            .unwrap_or(month_start);

        Self {
            today,
            week: DateRange::local(&tz, week_start, week_end),
            previous_week: DateRange::local(&tz, prev_week_start, week_start),
            month: DateRange::local(&tz, month_start, next_month),
            trailing_year: DateRange::local(&tz, year_start, next_month),
        }
    }
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

fn add_days(day: NaiveDate, n: u64) -> NaiveDate {
    day.checked_add_days(Days::new(n)).unwrap_or(day)
}

fn sub_days(day: NaiveDate, n: u64) -> NaiveDate {
    day.checked_sub_days(Days::new(n)).unwrap_or(day)
}

/// Start of `day` in `tz`, as UTC. A midnight skipped by a DST jump resolves
/// to the first instant that exists.
fn local_midnight<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> DateTime<Utc> {
    let naive = day.and_time(NaiveTime::MIN);
    let local = tz.from_local_datetime(&naive);
    match local.earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        None => {
            let shifted = naive + chrono::Duration::hours(1);
            tz.from_local_datetime(&shifted)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
        }
    }
}
