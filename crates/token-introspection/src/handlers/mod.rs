//! HTTP request handlers for the demo service.

pub mod health;
pub mod introspection;
pub mod metrics;

pub use health::health_check;
pub use introspection::echo_introspection;
pub use metrics::metrics_handler;
