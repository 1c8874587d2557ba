//! Snow report reconciler daemon

use chrono::Utc;
use tokio::signal;
use tracing::{error, info};

use snow_report::cache::SnapshotCache;
use snow_report::config::AppConfig;
use snow_report::errors::SnowReportError;
use snow_report::resorts::RESORT_LOCATIONS;
use snow_report::snapshot::Snapshot;
use snow_report::store::{HttpStore, ReportStore};

#[tokio::main]
async fn main() -> Result<(), SnowReportError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration, preferring environment variables and config files
    let config = AppConfig::load()?;
    config.validate()?;

    // A missing or broken store degrades to an all-default dashboard
    // rather than aborting; the snapshot carries the notice.
    let store = match HttpStore::new(&config.store) {
        Ok(store) => Some(store),
        Err(e) => {
            error!("Report store unavailable, continuing with defaults: {}", e);
            None
        }
    };

    // Setup signal handling for graceful shutdown
    let shutdown_signal = signal::ctrl_c();

    tokio::select! {
        result = run_snow_report(store, &config) => {
            info!("Snow report loop completed: {:?}", result);
        }
        _ = shutdown_signal => {
            info!("Received shutdown signal");
        }
    }

    Ok(())
}

/// Serve snapshots until shutdown: each poll tick stands in for an
/// inbound dashboard request, answered from the cache and recomputed
/// only after the TTL lapses. Every snapshot goes to stdout as one JSON
/// line for the rendering collaborator.
async fn run_snow_report(
    store: Option<HttpStore>,
    config: &AppConfig,
) -> Result<(), SnowReportError> {
    let store_ref: Option<&dyn ReportStore> = store.as_ref().map(|s| s as &dyn ReportStore);
    let cache = SnapshotCache::new(config.report.cache_ttl);
    let mut poll = tokio::time::interval(config.report.emit_interval);

    loop {
        poll.tick().await;

        let now = Utc::now().with_timezone(&config.report.timezone);
        let snapshot = cache
            .get_or_refresh(|| {
                Snapshot::build(store_ref, RESORT_LOCATIONS, &config.report, now)
            })
            .await;

        let reporting = snapshot
            .conditions
            .iter()
            .filter(|row| row.has_report)
            .count();
        info!(
            "Snapshot at {}: {}/{} resorts reporting, {} powder alerts",
            snapshot.generated_at,
            reporting,
            snapshot.conditions.len(),
            snapshot.powder_count
        );

        println!("{}", serde_json::to_string(&*snapshot)?);
    }
}
