//! Snapshot assembly.
//!
//! A snapshot is the complete, immutable product of one refresh: the
//! current-conditions table, the trailing snowfall series, and the powder
//! alert count. Building one never fails; every fetch problem degrades to
//! defaults and leaves a notice for the UI to surface.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::warn;

use crate::{
    config::ReportConfig,
    models::{CurrentConditionsRow, DailySnowPoint, RawReport, ResortLocation},
    reconcile,
    series::{self, DailyReports},
    store::ReportStore,
};

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub generated_at: DateTime<Tz>,
    /// One row per known resort, leaderboard order.
    pub conditions: Vec<CurrentConditionsRow>,
    /// Resort x day chart points with attached window totals.
    pub daily_snow: Vec<DailySnowPoint>,
    /// Number of resorts at or above the powder threshold.
    pub powder_count: usize,
    /// Non-fatal degradation notices, empty on a clean build.
    pub notices: Vec<String>,
}

impl Snapshot {
    /// Build a snapshot for `now`. `store` is `None` when the report
    /// store could not be constructed; the tables then come out with
    /// defaults only.
    pub async fn build(
        store: Option<&dyn ReportStore>,
        locations: &[ResortLocation],
        config: &ReportConfig,
        now: DateTime<Tz>,
    ) -> Snapshot {
        let mut notices = Vec::new();
        let today = now.date_naive();

        let latest_reports = match store {
            Some(store) => fetch_latest(store, &mut notices).await,
            None => {
                notices.push("Snow report store is unavailable; showing defaults.".to_string());
                Vec::new()
            }
        };

        let conditions =
            reconcile::reconcile_conditions(&latest_reports, locations, config, now);

        let history = match store {
            Some(store) => fetch_history(store, today, config.history_days, &mut notices).await,
            None => Vec::new(),
        };
        let resort_names: Vec<String> = conditions
            .iter()
            .map(|row| row.display_name.clone())
            .collect();
        let daily_snow = series::daily_snow_series(
            &history,
            &resort_names,
            config.timezone,
            today,
            config.history_days,
        );

        let powder_count = conditions.iter().filter(|row| row.is_powder).count();

        Snapshot {
            generated_at: now,
            conditions,
            daily_snow,
            powder_count,
            notices,
        }
    }
}

/// Fetch the latest snapshot date and its reports. Any failure yields an
/// empty batch so the table build proceeds with defaults.
async fn fetch_latest(store: &dyn ReportStore, notices: &mut Vec<String>) -> Vec<RawReport> {
    let latest = match store.latest_date().await {
        Ok(latest) => latest,
        Err(e) => {
            warn!("Failed to query latest snapshot date: {}", e);
            notices.push("Current conditions are unavailable.".to_string());
            return Vec::new();
        }
    };

    let Some(date) = latest else {
        return Vec::new();
    };

    match store.reports_for(date).await {
        Ok(reports) => reports,
        Err(e) => {
            warn!("Failed to load reports for {}: {}", date, e);
            notices.push(format!("Current conditions for {date} are unavailable."));
            Vec::new()
        }
    }
}

/// One independent point query per trailing day. A failed day becomes an
/// empty batch; the rest of the window still loads.
async fn fetch_history(
    store: &dyn ReportStore,
    today: NaiveDate,
    days: u32,
    notices: &mut Vec<String>,
) -> Vec<DailyReports> {
    let mut history = Vec::with_capacity(days as usize);

    for day in series::window_days(today, days) {
        let reports = match store.reports_for(day).await {
            Ok(reports) => reports,
            Err(e) => {
                warn!("Failed to load reports for {}: {}", day, e);
                notices.push(format!("Snowfall history for {day} is unavailable."));
                Vec::new()
            }
        };
        history.push(DailyReports {
            query_date: day,
            reports,
        });
    }

    history
}
