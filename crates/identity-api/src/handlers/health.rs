//! Health check handler.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache_ok = match state.cache.probe().await {
        Ok(healthy) => healthy,
        Err(e) => {
            warn!(error = %e, "Cache probe failed");
            false
        }
    };

    Json(HealthResponse {
        status: if cache_ok { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache: if cache_ok { "connected" } else { "unavailable" }.to_string(),
    })
}
