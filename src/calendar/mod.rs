// src/calendar/mod.rs
pub mod extract;
pub mod fetch;
pub mod store;
pub mod types;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use metrics::{counter, gauge, histogram};
use tokio::sync::Mutex;

use crate::calendar::extract::extract_events;
use crate::calendar::fetch::DocumentSource;
use crate::calendar::store::SnapshotStore;
use crate::calendar::types::{EconomicEvent, Snapshot};
use crate::error::{AcquisitionError, RefreshError};
use crate::metrics as m;

/// One acquisition result as handed to the API layer.
#[derive(Debug, Clone)]
pub struct CalendarBatch {
    pub events: Vec<EconomicEvent>,
    pub captured_at: DateTime<Utc>,
    pub cached: bool,
}

impl CalendarBatch {
    fn from_snapshot(snapshot: Snapshot, cached: bool) -> Self {
        Self {
            events: snapshot.events,
            captured_at: snapshot.captured_at,
            cached,
        }
    }
}

#[derive(Debug, Default)]
struct RefreshState {
    /// Completion time of the most recent refresh attempt, successful or not.
    last_attempt: Option<DateTime<Utc>>,
}

/// Cache-aside coordinator over fetcher, extractor, and snapshot store.
///
/// Serves a fresh snapshot without network I/O, refreshes when the snapshot
/// is stale or absent, and degrades to the last known-good snapshot when a
/// refresh fails. Concurrent callers in a stale window ride on a single
/// outbound fetch (the refresh gate).
pub struct CalendarService {
    source: Arc<dyn DocumentSource>,
    store: Arc<dyn SnapshotStore>,
    freshness: Duration,
    refresh_gate: Mutex<RefreshState>,
}

impl CalendarService {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        store: Arc<dyn SnapshotStore>,
        freshness: Duration,
    ) -> Self {
        m::ensure_metrics_described();

        Self {
            source,
            store,
            freshness,
            refresh_gate: Mutex::new(RefreshState::default()),
        }
    }

    /// Resolve the current calendar per the cache-aside policy.
    ///
    /// Fails only when a refresh fails *and* no snapshot, however stale, is
    /// available to fall back to.
    pub async fn get_events(&self) -> Result<CalendarBatch, AcquisitionError> {
        let arrived = Utc::now();

        // Fast path: a fresh snapshot answers without network I/O.
        if let Some(snap) = self.fresh_snapshot().await {
            counter!(m::CACHE_HITS).increment(1);
            return Ok(CalendarBatch::from_snapshot(snap, true));
        }

        // Stale or cold. The gate serializes refreshes so a burst of callers
        // produces one outbound fetch, not a thundering herd.
        let mut gate = self.refresh_gate.lock().await;

        if gate.last_attempt.is_some_and(|t| t > arrived) {
            // A refresh concluded while we waited for the gate; consume its
            // outcome instead of fetching again.
            if let Some(snap) = self.any_snapshot().await {
                counter!(m::CACHE_HITS).increment(1);
                return Ok(CalendarBatch::from_snapshot(snap, true));
            }
            // That refresh failed with nothing stored; fall through and try
            // ourselves.
        }

        let outcome = self.refresh().await;
        gate.last_attempt = Some(Utc::now());
        drop(gate);

        match outcome {
            Ok(snapshot) => Ok(CalendarBatch::from_snapshot(snapshot, false)),
            Err(err) => {
                tracing::warn!(error = ?err, "calendar refresh failed, trying stored snapshot");
                counter!(m::REFRESH_ERRORS).increment(1);
                match self.any_snapshot().await {
                    // A stale snapshot beats an error to the caller.
                    Some(snap) => {
                        counter!(m::STALE_SERVED).increment(1);
                        Ok(CalendarBatch::from_snapshot(snap, true))
                    }
                    None => Err(AcquisitionError::from(err)),
                }
            }
        }
    }

    /// Stored snapshot younger than the freshness window, if any.
    /// A snapshot exactly at the boundary counts as stale.
    async fn fresh_snapshot(&self) -> Option<Snapshot> {
        let snap = self.any_snapshot().await?;
        let age = Utc::now().signed_duration_since(snap.captured_at);
        (age < self.freshness).then_some(snap)
    }

    /// Stored snapshot regardless of age. Store read errors are demoted to
    /// "no snapshot" so a broken store behaves like a cold cache.
    async fn any_snapshot(&self) -> Option<Snapshot> {
        match self.store.latest().await {
            Ok(snap) => snap,
            Err(e) => {
                tracing::warn!(error = ?e, "snapshot read failed");
                None
            }
        }
    }

    /// One full refresh: fetch, extract, persist.
    ///
    /// A failed save is logged but does not fail the refresh; the fresh data
    /// is still returned, the cache just won't outlive this call.
    async fn refresh(&self) -> Result<Snapshot, RefreshError> {
        counter!(m::REFRESH_ATTEMPTS).increment(1);

        let html = self.source.fetch().await?;

        let t0 = std::time::Instant::now();
        let events = extract_events(&html)?;
        histogram!(m::EXTRACT_MS).record(t0.elapsed().as_secs_f64() * 1_000.0);

        if events.is_empty() {
            tracing::warn!(source = self.source.name(), "extraction produced no events");
        }

        let snapshot = Snapshot {
            events,
            captured_at: Utc::now(),
        };
        gauge!(m::SNAPSHOT_EVENTS).set(snapshot.events.len() as f64);

        if let Err(e) = self.store.save(&snapshot).await {
            tracing::warn!(error = ?e, "snapshot save failed");
        }

        tracing::info!(
            source = self.source.name(),
            events = snapshot.events.len(),
            "calendar refreshed"
        );
        Ok(snapshot)
    }
}
