//! Time-boxed snapshot cache.
//!
//! Refreshes are lazy: the cached snapshot is served until its TTL
//! passes, and the first request after expiry rebuilds it. Each rebuild
//! produces an independent, fully formed snapshot; no partial update is
//! ever visible.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::snapshot::Snapshot;

pub struct SnapshotCache {
    ttl: Duration,
    slot: Mutex<Option<CacheEntry>>,
}

struct CacheEntry {
    built_at: Instant,
    snapshot: Arc<Snapshot>,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Return the cached snapshot, rebuilding through `rebuild` when the
    /// entry is missing or older than the TTL.
    pub async fn get_or_refresh<F, Fut>(&self, rebuild: F) -> Arc<Snapshot>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Snapshot>,
    {
        let mut slot = self.slot.lock().await;

        if let Some(entry) = slot.as_ref() {
            if entry.built_at.elapsed() < self.ttl {
                return Arc::clone(&entry.snapshot);
            }
        }

        let snapshot = Arc::new(rebuild().await);
        *slot = Some(CacheEntry {
            built_at: Instant::now(),
            snapshot: Arc::clone(&snapshot),
        });
        snapshot
    }
}
