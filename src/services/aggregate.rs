use crate::format;
use crate::models::{IndicatorRow, MonthlyPoint, PeriodAggregate};
use chrono::{Datelike, NaiveDate, TimeZone};
use std::collections::BTreeMap;

const TREND_MONTHS: usize = 12;

/// Sum energy, waste and tax (missing values count as zero) and average the
/// efficiency of the rows that have one.
pub fn aggregate(rows: &[IndicatorRow]) -> PeriodAggregate {
    let mut agg = PeriodAggregate::default();
    let mut eff_sum = 0.0;
    let mut eff_count = 0usize;

    for row in rows {
        agg.energy += row.energy_generated.unwrap_or(0.0);
        agg.waste += row.waste_processed.unwrap_or(0.0);
        agg.tax += row.tax_savings.unwrap_or(0.0);
        if let Some(eff) = row.efficiency {
            eff_sum += eff;
            eff_count += 1;
        }
    }

    if eff_count > 0 {
        agg.avg_efficiency = Some(eff_sum / eff_count as f64);
    }
    agg
}

/// Per-month totals in `tz`, oldest first, at most the last twelve months
/// that have data.
pub fn monthly_trend<Tz: TimeZone>(rows: &[IndicatorRow], tz: &Tz) -> Vec<MonthlyPoint> {
    let mut buckets: BTreeMap<NaiveDate, (f64, f64, f64)> = BTreeMap::new();

    for row in rows {
        let Some(ts) = row.observed_at() else {
            continue;
        };
        let local = ts.with_timezone(tz).date_naive();
        let Some(month) = local.with_day(1) else {
            continue;
        };
        let acc = buckets.entry(month).or_insert((0.0, 0.0, 0.0));
        acc.0 += row.waste_processed.unwrap_or(0.0);
        acc.1 += row.energy_generated.unwrap_or(0.0);
        acc.2 += row.tax_savings.unwrap_or(0.0);
    }

    let skip = buckets.len().saturating_sub(TREND_MONTHS);
    buckets
        .into_iter()
        .skip(skip)
        .map(|(month, (waste, energy, tax))| MonthlyPoint {
            name: format::month_short(month).to_string(),
            waste_processed: round2(waste),
            energy_generated: round2(energy),
            tax_deduction: round2(tax),
        })
        .collect()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use pretty_assertions::assert_eq;

    fn row(energy: Option<f64>, waste: Option<f64>, tax: Option<f64>, eff: Option<f64>) -> IndicatorRow {
        IndicatorRow {
            energy_generated: energy,
            waste_processed: waste,
            tax_savings: tax,
            efficiency: eff,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_rows() {
        assert_eq!(
            aggregate(&[]),
            PeriodAggregate {
                energy: 0.0,
                waste: 0.0,
                tax: 0.0,
                avg_efficiency: None,
            }
        );
    }

    #[test]
    fn test_reference_fixture() {
        let energy = [10.0, 20.0, 30.0, 0.0, 5.0];
        let waste = [1.0, 2.0, 3.0, 4.0, 5.0];
        let tax = [1.5, 2.5, 0.0, 0.0, 1.0];
        let eff = [Some(90.0), None, Some(80.0), None, Some(70.0)];
        let rows: Vec<_> = (0..5)
            .map(|i| row(Some(energy[i]), Some(waste[i]), Some(tax[i]), eff[i]))
            .collect();

        let agg = aggregate(&rows);

        assert_eq!(agg.energy, 65.0);
        assert_eq!(agg.waste, 15.0);
        assert_eq!(agg.tax, 5.0);
        assert_eq!(agg.avg_efficiency, Some(80.0));
    }

    #[test]
    fn test_nulls_count_as_zero() {
        let rows = vec![
            row(Some(4.0), None, Some(1.25), None),
            row(None, Some(7.0), None, None),
        ];
        let agg = aggregate(&rows);
        assert_eq!(agg.energy, 4.0);
        assert_eq!(agg.waste, 7.0);
        assert_eq!(agg.tax, 1.25);
    }

    #[test]
    fn test_no_efficiency_is_none_not_zero() {
        let rows = vec![row(Some(1.0), Some(1.0), Some(1.0), None); 3];
        assert_eq!(aggregate(&rows).avg_efficiency, None);
    }

    #[test]
    fn test_efficiency_mean_is_order_independent() {
        let mut rows = vec![
            row(None, None, None, Some(50.0)),
            row(None, None, None, None),
            row(None, None, None, Some(100.0)),
            row(None, None, None, Some(0.0)),
        ];
        let forward = aggregate(&rows).avg_efficiency;
        rows.reverse();
        assert_eq!(forward, Some(50.0));
        assert_eq!(aggregate(&rows).avg_efficiency, forward);
    }

    #[test]
    fn test_monthly_trend_buckets_by_local_month() {
        let tz = FixedOffset::west_opt(3 * 3600).unwrap();
        let at = |y, m, d, h| Some(Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap());
        let rows = vec![
            IndicatorRow {
                energy_generated: Some(1.111),
                waste_processed: Some(2.0),
                measured_at: at(2026, 9, 10, 12),
                ..Default::default()
            },
            // 01:00 UTC on Oct 1st is still September in -03:00
            IndicatorRow {
                energy_generated: Some(1.0),
                tax_savings: Some(0.5),
                measured_at: at(2026, 10, 1, 1),
                ..Default::default()
            },
            IndicatorRow {
                waste_processed: Some(3.0),
                created_at: at(2026, 10, 15, 12),
                ..Default::default()
            },
            IndicatorRow::default(),
        ];

        let trend = monthly_trend(&rows, &tz);

        assert_eq!(
            trend,
            vec![
                MonthlyPoint {
                    name: "Set".into(),
                    waste_processed: 2.0,
                    energy_generated: 2.11,
                    tax_deduction: 0.5,
                },
                MonthlyPoint {
                    name: "Out".into(),
                    waste_processed: 3.0,
                    energy_generated: 0.0,
                    tax_deduction: 0.0,
                },
            ]
        );
    }

    #[test]
    fn test_monthly_trend_keeps_last_twelve() {
        let rows: Vec<_> = (0..14)
            .map(|i| IndicatorRow {
                energy_generated: Some(i as f64),
                created_at: Some(
                    Utc.with_ymd_and_hms(2025 + (i / 12) as i32, (i % 12) as u32 + 1, 5, 12, 0, 0)
                        .unwrap(),
                ),
                ..Default::default()
            })
            .collect();

        let trend = monthly_trend(&rows, &Utc);

        assert_eq!(trend.len(), 12);
        assert_eq!(trend[0].name, "Mar");
        assert_eq!(trend[0].energy_generated, 2.0);
        assert_eq!(trend[11].name, "Fev");
    }
}
