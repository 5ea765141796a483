//! Observability for token introspection.

pub mod metrics;
