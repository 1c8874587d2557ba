//! Current-conditions reconciliation.
//!
//! Left-joins the static resort list with the latest batch of raw reports,
//! zeroes snowfall figures that are too old to trust, and derives the
//! display amount and powder flag from what remains.

use std::cmp::Ordering;

use chrono::{DateTime, Datelike, Duration, NaiveDate};
use chrono_tz::Tz;

use crate::{
    config::{FreshnessPolicy, ReportConfig},
    models::{CurrentConditionsRow, RawReport, ResortLocation, NOT_AVAILABLE},
    resorts,
};

/// First day of the season containing `today`: October 1 of the current
/// year from October onward, October 1 of the previous year before that.
pub fn season_start(today: NaiveDate) -> NaiveDate {
    let year = if today.month() >= 10 {
        today.year()
    } else {
        today.year() - 1
    };
    NaiveDate::from_ymd_opt(year, 10, 1).expect("October 1 exists in every year")
}

/// Build the current-conditions table for `now`.
///
/// Every location yields exactly one row whether or not a report matched;
/// the raw feed never decides the table's key set. Output is sorted for
/// the leaderboard: reporting resorts first, then most recent snapshot
/// date, then deepest display snow, then name.
pub fn reconcile_conditions(
    reports: &[RawReport],
    locations: &[ResortLocation],
    config: &ReportConfig,
    now: DateTime<Tz>,
) -> Vec<CurrentConditionsRow> {
    let mut rows: Vec<CurrentConditionsRow> = locations
        .iter()
        .map(|location| {
            let report = reports
                .iter()
                .find(|r| resorts::display_name(&r.resort) == location.name);
            build_row(location, report, config, now)
        })
        .collect();

    rows.sort_by(|a, b| {
        b.has_report
            .cmp(&a.has_report)
            .then_with(|| b.report_date.cmp(&a.report_date))
            .then_with(|| {
                b.display_snow
                    .partial_cmp(&a.display_snow)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.display_name.cmp(&b.display_name))
    });
    rows
}

fn build_row(
    location: &ResortLocation,
    report: Option<&RawReport>,
    config: &ReportConfig,
    now: DateTime<Tz>,
) -> CurrentConditionsRow {
    let mut row = match report {
        Some(report) => {
            let last_updated_dt = report.last_updated_in(config.timezone);
            CurrentConditionsRow {
                display_name: location.name.to_string(),
                lat: location.lat,
                lon: location.lon,
                // A document without a parseable update time does not
                // count as reporting.
                has_report: last_updated_dt.is_some(),
                report_date: report.report_date(),
                last_updated: report.last_updated.clone(),
                last_updated_dt,
                snow_24h_summit: report.snow_24h_summit,
                snow_24h_base: report.snow_24h_base,
                base_depth: report.base_depth,
                summit_depth: report.summit_depth,
                snow_overnight: report.snow_overnight,
                temp_base: report.temp_base,
                temp_summit: report.temp_summit,
                wind_speed: report.wind_speed,
                lifts_open: report.lifts_open.clone(),
                runs_open: report.runs_open.clone(),
                conditions_surface: report.conditions_surface.clone(),
                comments: report.comments.clone(),
                nws_forecast: report.nws_forecast.clone(),
                snotel_data: report.snotel_data.clone(),
                display_snow: 0.0,
                is_powder: false,
            }
        }
        None => empty_row(location),
    };

    apply_staleness(&mut row, config, now);
    row.display_snow = row.snow_24h_summit.max(row.snow_24h_base);
    row.is_powder = row.display_snow >= config.powder_threshold;
    row
}

fn empty_row(location: &ResortLocation) -> CurrentConditionsRow {
    CurrentConditionsRow {
        display_name: location.name.to_string(),
        lat: location.lat,
        lon: location.lon,
        has_report: false,
        report_date: None,
        last_updated: NOT_AVAILABLE.to_string(),
        last_updated_dt: None,
        snow_24h_summit: 0.0,
        snow_24h_base: 0.0,
        base_depth: 0.0,
        summit_depth: 0.0,
        snow_overnight: 0.0,
        temp_base: 0.0,
        temp_summit: 0.0,
        wind_speed: 0.0,
        lifts_open: NOT_AVAILABLE.to_string(),
        runs_open: NOT_AVAILABLE.to_string(),
        conditions_surface: NOT_AVAILABLE.to_string(),
        comments: NOT_AVAILABLE.to_string(),
        nws_forecast: Default::default(),
        snotel_data: Default::default(),
        display_snow: 0.0,
        is_powder: false,
    }
}

/// Zero out snowfall figures the report is too old to vouch for.
///
/// Season staleness first: a report from before October 1 (or with no
/// usable timestamp at all) loses every depth figure. Reports from this
/// season then pass the configured freshness check, which zeroes only the
/// new-snow fields; base and summit depths are standing snowpack and
/// survive anything but a season rollover.
fn apply_staleness(row: &mut CurrentConditionsRow, config: &ReportConfig, now: DateTime<Tz>) {
    let season_open = season_start(now.date_naive());

    match row.last_updated_dt {
        None => zero_depths(row),
        Some(updated) if updated.date_naive() < season_open => zero_depths(row),
        Some(updated) => {
            if is_stale(updated, now, config.freshness) {
                zero_new_snow(row);
            }
        }
    }
}

fn is_stale(updated: DateTime<Tz>, now: DateTime<Tz>, policy: FreshnessPolicy) -> bool {
    match policy {
        FreshnessPolicy::CalendarDay => updated.date_naive() < now.date_naive(),
        FreshnessPolicy::RollingWindow { tolerance_hours } => {
            now.signed_duration_since(updated) > Duration::hours(i64::from(tolerance_hours))
        }
    }
}

fn zero_depths(row: &mut CurrentConditionsRow) {
    zero_new_snow(row);
    row.base_depth = 0.0;
    row.summit_depth = 0.0;
}

fn zero_new_snow(row: &mut CurrentConditionsRow) {
    row.snow_24h_summit = 0.0;
    row.snow_24h_base = 0.0;
    row.snow_overnight = 0.0;
}
