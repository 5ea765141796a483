//! Prometheus metrics endpoint handler.
//!
//! This endpoint is unauthenticated. Metric labels never carry tokens.

use crate::routes::AppState;
use axum::{extract::State, response::IntoResponse};
use std::sync::Arc;

/// Handler for GET /metrics
///
/// Returns Prometheus text format:
/// ```text
/// # TYPE introspection_requests_total counter
/// introspection_requests_total{outcome="active"} 42
/// ```
#[tracing::instrument(skip_all, name = "introspection.metrics.scrape")]
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.metrics_handle.render()
}
