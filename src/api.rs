use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::calendar::types::EconomicEvent;
use crate::calendar::CalendarService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CalendarService>,
}

pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/calendar", get(get_calendar))
        .layer(build_cors(allowed_origins))
        .with_state(state)
}

/// CORS from the configured allow-list; an empty list falls back to the
/// permissive layer (local development).
fn build_cors(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        CorsLayer::very_permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(parsed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

#[derive(serde::Serialize)]
struct CalendarResponse {
    events: Vec<EconomicEvent>,
    last_updated: String,
    cached: bool,
}

async fn get_calendar(
    State(state): State<AppState>,
) -> Result<Json<CalendarResponse>, (StatusCode, String)> {
    match state.service.get_events().await {
        Ok(batch) => Ok(Json(CalendarResponse {
            events: batch.events,
            last_updated: batch.captured_at.to_rfc3339(),
            cached: batch.cached,
        })),
        Err(e) => {
            tracing::error!(error = ?e, "calendar acquisition exhausted");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
