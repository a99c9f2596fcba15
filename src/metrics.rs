//! # Metrics
//! Prometheus recorder plus the series registry for the acquisition pipeline.

use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

// Series names, shared between registration here and the recording call
// sites in the coordinator.
pub const CACHE_HITS: &str = "calendar_cache_hits_total";
pub const REFRESH_ATTEMPTS: &str = "calendar_refresh_total";
pub const REFRESH_ERRORS: &str = "calendar_refresh_errors_total";
pub const STALE_SERVED: &str = "calendar_stale_served_total";
pub const EXTRACT_MS: &str = "calendar_extract_ms";
pub const SNAPSHOT_EVENTS: &str = "calendar_snapshot_events";

/// Register help text for every series the pipeline records.
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            CACHE_HITS,
            "Queries answered from a fresh snapshot without network I/O."
        );
        describe_counter!(REFRESH_ATTEMPTS, "Outbound calendar refresh attempts.");
        describe_counter!(
            REFRESH_ERRORS,
            "Refresh attempts that failed (fetch or extract)."
        );
        describe_counter!(
            STALE_SERVED,
            "Queries answered from a stale snapshot after a failed refresh."
        );
        describe_histogram!(EXTRACT_MS, "Extraction time in milliseconds.");
        describe_gauge!(SNAPSHOT_EVENTS, "Event count in the most recent snapshot.");
    });
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder, register the series descriptions, and
    /// publish the configured freshness window as a static gauge.
    pub fn init(freshness_minutes: u64) -> Self {
        let handle = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(EXTRACT_MS.to_string()),
                &[1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0],
            )
            .expect("prometheus: histogram buckets")
            .install_recorder()
            .expect("prometheus: install recorder");

        ensure_metrics_described();
        gauge!("calendar_freshness_window_minutes").set(freshness_minutes as f64);

        Self { handle }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
