//! Token Introspection Middleware
//!
//! Validates bearer tokens against a remote OAuth 2.0 token introspection
//! endpoint (RFC 7662) and attaches the outcome to each request for
//! downstream handlers:
//!
//! - Bearer token extraction from the `Authorization` header
//! - Optional result caching behind the [`IntrospectionCache`] capability
//! - One bounded `POST` to the introspection endpoint per uncached request
//! - A tower layer that never rejects: handlers read the outcome and decide
//!
//! # Architecture
//!
//! ```text
//! IntrospectionLayer -> resolve_outcome -> bearer / cache / IntrospectionClient
//!                    -> request extensions -> from_request / Introspected
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::{routing::get, Router};
//! use token_introspection::{Introspected, IntrospectionLayer, IntrospectionOptions};
//!
//! let options = IntrospectionOptions::new("https://auth.example.com/oauth/introspect");
//! let app: Router = Router::new()
//!     .route("/me", get(|Introspected(outcome): Introspected| async move {
//!         format!("{:?}", outcome.map(|r| r.active))
//!     }))
//!     .layer(IntrospectionLayer::from_options(options)?);
//! ```
//!
//! # Modules
//!
//! - `bearer` - Credential extraction
//! - `cache` - Result cache capability and in-memory implementation
//! - `client` - Introspection endpoint client
//! - `config` - Service configuration from environment
//! - `errors` - Error taxonomy with HTTP status code mapping
//! - `handlers` - Demo service handlers
//! - `middleware` - Tower layer and outcome lookup
//! - `models` - Introspection response model
//! - `observability` - Metrics
//! - `options` - Introspection options
//! - `routes` - Axum router for the demo service

pub mod bearer;
pub mod cache;
pub mod client;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod options;
pub mod routes;

pub use cache::{InMemoryCache, IntrospectionCache};
pub use client::{introspect, IntrospectionClient};
pub use errors::IntrospectionError;
pub use middleware::{
    from_extensions, from_parts, from_request, resolve_outcome, Introspected, IntrospectionLayer,
    IntrospectionService,
};
pub use models::IntrospectionResult;
pub use options::{IntrospectionOptions, StatusPolicy};
