//! HTTP routes for the demo service.
//!
//! Defines the Axum router and application state.

use crate::client::IntrospectionClient;
use crate::config::Config;
use crate::handlers;
use crate::middleware::IntrospectionLayer;
use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub use crate::observability::metrics::init_metrics_recorder;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Config,

    /// Client used by the introspection layer.
    pub client: IntrospectionClient,

    /// Handle for rendering Prometheus metrics.
    pub metrics_handle: PrometheusHandle,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/v1/health` - Health check endpoint
/// - `/metrics` - Prometheus metrics
/// - `/v1/introspection` - Echo of the introspection outcome
/// - TraceLayer for request logging
/// - 30 second request timeout
pub fn build_routes(state: Arc<AppState>) -> Router {
    // Only this route is decorated with the introspection outcome
    let introspected_routes = Router::new()
        .route("/v1/introspection", get(handlers::echo_introspection))
        .layer(IntrospectionLayer::new(state.client.clone()));

    let public_routes = Router::new()
        .route("/v1/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(state);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    public_routes
        .merge(introspected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        // Required for Axum's State extractor
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_config_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<Config>();
    }
}
