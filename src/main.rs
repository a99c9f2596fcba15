//! Economic Calendar Service — Binary Entrypoint
//! Wires config, the acquisition pipeline, and the Axum HTTP server.

use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use econ_calendar_service::api::{self, AppState};
use econ_calendar_service::calendar::fetch::HttpFetcher;
use econ_calendar_service::calendar::store::FileStore;
use econ_calendar_service::calendar::CalendarService;
use econ_calendar_service::config::ServiceConfig;
use econ_calendar_service::metrics::Metrics;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("econ_calendar_service=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = ServiceConfig::from_env();
    tracing::info!(
        source = %cfg.source_url,
        freshness_minutes = cfg.freshness_minutes,
        "starting calendar service"
    );

    let metrics = Metrics::init(cfg.freshness_minutes);

    let fetcher = HttpFetcher::new(cfg.source_url.clone(), cfg.fetch_timeout)
        .with_delay_ms(cfg.fetch_delay_ms.clone());
    let store = FileStore::new(cfg.snapshot_path.clone());
    let service = Arc::new(CalendarService::new(
        Arc::new(fetcher),
        Arc::new(store),
        cfg.freshness(),
    ));

    // Pre-warm the cache. A failure here is logged and the server starts anyway.
    match service.get_events().await {
        Ok(batch) => tracing::info!(events = batch.events.len(), "calendar cache pre-warmed"),
        Err(e) => tracing::warn!(error = ?e, "calendar pre-warm failed"),
    }

    let state = AppState { service };
    let app = api::create_router(state, &cfg.allowed_origins).merge(metrics.router());

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!(addr = %cfg.bind_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
