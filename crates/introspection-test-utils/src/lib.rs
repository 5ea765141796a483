//! # Introspection Test Utilities
//!
//! Shared test utilities for the token introspection crate.
//!
//! This crate provides:
//! - Stub introspection endpoint (`StubIntrospectionServer`, backed by wiremock)
//! - Cache that records what it was asked to store (`RecordingCache`)
//! - Server test harness (`TestIntrospectionServer` for E2E tests)
//! - Request builders (`bearer_request`, `request_with_authorization`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use introspection_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), anyhow::Error> {
//!     let stub = StubIntrospectionServer::start().await;
//!     stub.mount_active(serde_json::json!({"active": true, "sub": "u1"})).await;
//!
//!     let server = TestIntrospectionServer::spawn(&stub.endpoint()).await?;
//!     let response = reqwest::Client::new()
//!         .get(format!("{}/v1/introspection", server.url()))
//!         .bearer_auth("abc123")
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod recording_cache;
pub mod requests;
pub mod server_harness;
pub mod stub_server;

// Re-export commonly used items
pub use recording_cache::*;
pub use requests::*;
pub use server_harness::*;
pub use stub_server::*;
