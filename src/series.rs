//! Trailing daily snowfall series for the chart.

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;

use crate::models::{DailySnowPoint, RawReport};
use crate::resorts;

/// One day's worth of raw reports, tagged with the date they were
/// queried under. The query date and a report's own `last_updated` can
/// disagree; the aggregator checks both.
#[derive(Debug, Clone)]
pub struct DailyReports {
    pub query_date: NaiveDate,
    pub reports: Vec<RawReport>,
}

/// The trailing window of calendar days ending at `today`, oldest first.
pub fn window_days(today: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..i64::from(days))
        .rev()
        .map(|offset| today - Duration::days(offset))
        .collect()
}

/// Build the per-resort daily snowfall series over the trailing window.
///
/// Every resort gets a full set of points even when no day has data, so
/// the chart can place a zero-height row. A day's snow counts only if
/// that day's query returned a report whose own `last_updated` falls on
/// the same calendar day; a report surfacing under a query date it was
/// not actually written on is a backfill artifact and contributes zero.
pub fn daily_snow_series(
    history: &[DailyReports],
    resort_names: &[String],
    tz: Tz,
    today: NaiveDate,
    days: u32,
) -> Vec<DailySnowPoint> {
    let window = window_days(today, days);
    let mut points = Vec::with_capacity(resort_names.len() * window.len());

    for name in resort_names {
        let start = points.len();
        let mut total = 0.0;

        for &day in &window {
            let snow = history
                .iter()
                .find(|batch| batch.query_date == day)
                .and_then(|batch| {
                    batch
                        .reports
                        .iter()
                        .find(|r| resorts::display_name(&r.resort) == name)
                })
                .map(|report| fresh_snow_for_day(report, day, tz))
                .unwrap_or(0.0);

            total += snow;
            points.push(DailySnowPoint {
                display_name: name.clone(),
                date: day,
                snow,
                total_snow: 0.0,
            });
        }

        for point in &mut points[start..] {
            point.total_snow = total;
        }
    }

    points
}

fn fresh_snow_for_day(report: &RawReport, day: NaiveDate, tz: Tz) -> f64 {
    let amount = report.snow_24h_summit.max(report.snow_24h_base).max(0.0);
    match report.last_updated_in(tz) {
        Some(updated) if updated.date_naive() == day => amount,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Denver;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    fn report(resort: &str, last_updated: &str, summit: f64, base: f64) -> RawReport {
        RawReport {
            resort: resort.to_string(),
            last_updated: last_updated.to_string(),
            snow_24h_summit: summit,
            snow_24h_base: base,
            ..RawReport::default()
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn window_is_oldest_first_and_ends_today() {
        let window = window_days(day(15), 5);
        assert_eq!(window, vec![day(11), day(12), day(13), day(14), day(15)]);
    }

    #[test]
    fn two_reporting_days_out_of_five_zero_fill_the_rest() {
        let history = vec![
            DailyReports {
                query_date: day(12),
                reports: vec![report("BridgerBowl", "2026-01-12 06:00", 4.0, 2.0)],
            },
            DailyReports {
                query_date: day(14),
                reports: vec![report("BridgerBowl", "2026-01-14 06:30", 3.0, 5.0)],
            },
        ];

        let points =
            daily_snow_series(&history, &names(&["Bridger Bowl"]), Denver, day(15), 5);

        assert_eq!(points.len(), 5);
        let snow: Vec<f64> = points.iter().map(|p| p.snow).collect();
        assert_eq!(snow, vec![0.0, 4.0, 0.0, 5.0, 0.0]);
        assert!(points.iter().all(|p| p.total_snow == 9.0));
    }

    #[test]
    fn resort_with_no_records_yields_all_zero_series() {
        let points = daily_snow_series(&[], &names(&["Big Sky"]), Denver, day(15), 5);

        assert_eq!(points.len(), 5);
        assert!(points.iter().all(|p| p.snow == 0.0 && p.total_snow == 0.0));
        assert!(points.iter().all(|p| p.display_name == "Big Sky"));
    }

    #[test]
    fn report_dated_off_its_query_day_is_excluded() {
        // Queried under the 14th but written on the 13th: backfill lag.
        let history = vec![DailyReports {
            query_date: day(14),
            reports: vec![report("BridgerBowl", "2026-01-13 22:00", 6.0, 0.0)],
        }];

        let points =
            daily_snow_series(&history, &names(&["Bridger Bowl"]), Denver, day(15), 5);

        assert!(points.iter().all(|p| p.snow == 0.0));
    }

    #[test]
    fn unparseable_timestamp_contributes_zero() {
        let history = vec![DailyReports {
            query_date: day(14),
            reports: vec![report("BridgerBowl", "N/A", 6.0, 0.0)],
        }];

        let points =
            daily_snow_series(&history, &names(&["Bridger Bowl"]), Denver, day(15), 5);

        assert!(points.iter().all(|p| p.snow == 0.0));
    }

    #[test]
    fn day_value_is_max_of_summit_and_base_clamped_nonnegative() {
        let history = vec![
            DailyReports {
                query_date: day(14),
                reports: vec![report("BridgerBowl", "2026-01-14 06:00", 2.0, 7.0)],
            },
            DailyReports {
                query_date: day(15),
                reports: vec![report("BridgerBowl", "2026-01-15 06:00", -1.0, -3.0)],
            },
        ];

        let points =
            daily_snow_series(&history, &names(&["Bridger Bowl"]), Denver, day(15), 5);

        let by_date: Vec<(NaiveDate, f64)> = points.iter().map(|p| (p.date, p.snow)).collect();
        assert!(by_date.contains(&(day(14), 7.0)));
        assert!(by_date.contains(&(day(15), 0.0)));
        assert!(points.iter().all(|p| p.total_snow == 7.0));
    }

    #[test]
    fn series_follows_the_given_resort_order() {
        let points = daily_snow_series(
            &[],
            &names(&["Schweitzer", "Big Sky"]),
            Denver,
            day(15),
            2,
        );

        let order: Vec<&str> = points.iter().map(|p| p.display_name.as_str()).collect();
        assert_eq!(order, vec!["Schweitzer", "Schweitzer", "Big Sky", "Big Sky"]);
    }

    #[test]
    fn compact_keys_join_through_name_resolution() {
        let history = vec![DailyReports {
            query_date: day(15),
            reports: vec![report("RedLodge", "2026-01-15 05:00", 4.0, 1.0)],
        }];

        let points = daily_snow_series(
            &history,
            &names(&["Red Lodge Mountain"]),
            Denver,
            day(15),
            5,
        );

        assert_eq!(points.last().unwrap().snow, 4.0);
        assert!(points.iter().all(|p| p.total_snow == 4.0));
    }
}
