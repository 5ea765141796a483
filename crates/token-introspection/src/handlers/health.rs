//! Health check handler.

use crate::models::HealthResponse;
use crate::routes::AppState;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tracing::instrument;

/// Health check handler.
///
/// The service has no backing store, so it is healthy whenever it answers.
///
/// ## Example Response
///
/// ```json
/// {
///   "status": "healthy",
///   "cache": "disabled"
/// }
/// ```
#[instrument(skip_all, name = "introspection.health.check")]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(health_response(state.config.cache_enabled()))
}

fn health_response(cache_enabled: bool) -> HealthResponse {
    HealthResponse {
        status: "healthy".to_string(),
        cache: if cache_enabled { "enabled" } else { "disabled" }.to_string(),
    }
}
