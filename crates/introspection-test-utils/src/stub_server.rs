//! Stub introspection endpoint.

use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path the stub serves introspection on.
pub const INTROSPECTION_PATH: &str = "/oauth/introspect";

/// Wiremock server that answers `POST /oauth/introspect`.
///
/// # Example
/// ```rust,ignore
/// let stub = StubIntrospectionServer::start().await;
/// stub.mount_inactive().await;
///
/// let options = IntrospectionOptions::new(stub.endpoint());
/// // ...
/// assert_eq!(stub.received_calls().await, 1);
/// ```
pub struct StubIntrospectionServer {
    server: MockServer,
}

impl StubIntrospectionServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Full URL of the introspection endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.server.uri(), INTROSPECTION_PATH)
    }

    /// Answer every call with 200 and the given body.
    pub async fn mount_active(&self, body: Value) {
        self.mount_response(200, body).await;
    }

    /// Answer every call with `{"active": false}`.
    pub async fn mount_inactive(&self) {
        self.mount_response(200, json!({"active": false})).await;
    }

    /// Answer every call with the given status and JSON body.
    pub async fn mount_response(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path(INTROSPECTION_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Answer every call with the given status and a plain-text body.
    pub async fn mount_status(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path(INTROSPECTION_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string("stub error"))
            .mount(&self.server)
            .await;
    }

    /// Answer every call with an active result after `delay`.
    pub async fn mount_slow(&self, delay: Duration) {
        Mock::given(method("POST"))
            .and(path(INTROSPECTION_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"active": true}))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// Number of requests the stub has received.
    pub async fn received_calls(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }

    /// Form body of the most recent request, as received.
    pub async fn last_form_body(&self) -> Option<String> {
        self.server
            .received_requests()
            .await
            .and_then(|requests| requests.last().map(|r| String::from_utf8_lossy(&r.body).into_owned()))
    }
}
