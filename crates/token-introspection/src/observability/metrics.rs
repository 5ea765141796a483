//! Introspection metrics.
//!
//! All metrics follow Prometheus naming conventions:
//! - `introspection_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded by code:
//! - `outcome`: `active`, `inactive`, or an error kind
//! - `status`: `success`, `error_body`, or an error kind
//! - `result`: `hit`, `miss`

use crate::errors::IntrospectionError;
use crate::models::IntrospectionResult;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Install the Prometheus recorder and return the handle used by `/metrics`.
///
/// Call duration buckets follow the default 2 second call timeout.
///
/// # Errors
///
/// Returns error if the recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("introspection_call".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 2.000, 5.000,
            ],
        )
        .map_err(|e| format!("Failed to set introspection call buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

/// Record the outcome published for a request.
///
/// Metric: `introspection_requests_total`
/// Labels: `outcome`
pub fn record_outcome(outcome: &Result<IntrospectionResult, IntrospectionError>) {
    counter!("introspection_requests_total",
        "outcome" => outcome_label(outcome)
    )
    .increment(1);
}

/// Record a call to the introspection endpoint.
///
/// Metric: `introspection_call_duration_seconds`
/// Labels: `status`
pub fn record_introspection_call(status: &'static str, duration: Duration) {
    histogram!("introspection_call_duration_seconds",
        "status" => status
    )
    .record(duration.as_secs_f64());
}

/// Record a cache lookup.
///
/// Metric: `introspection_cache_lookups_total`
/// Labels: `result`
pub fn record_cache_lookup(hit: bool) {
    counter!("introspection_cache_lookups_total",
        "result" => if hit { "hit" } else { "miss" }
    )
    .increment(1);
}

fn outcome_label(outcome: &Result<IntrospectionResult, IntrospectionError>) -> &'static str {
    match outcome {
        Ok(result) if result.active => "active",
        Ok(_) => "inactive",
        Err(e) => e.kind(),
    }
}
