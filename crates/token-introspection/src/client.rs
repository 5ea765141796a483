//! Introspection endpoint client.
//!
//! Performs one `POST` per call against the configured endpoint:
//!
//! ```text
//! POST /introspect
//! Content-Type: application/x-www-form-urlencoded
//! Accept: application/json
//!
//! token=<token>&token_type_hint=access_token
//! ```
//!
//! No retries are performed; the client timeout bounds every call.

use crate::errors::IntrospectionError;
use crate::models::IntrospectionResult;
use crate::observability::metrics;
use crate::options::{IntrospectionOptions, StatusPolicy};
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, trace, warn};

/// Client for an RFC 7662 introspection endpoint.
///
/// Cheap to clone; clones share the HTTP connection pool and options.
#[derive(Clone, Debug)]
pub struct IntrospectionClient {
    http_client: reqwest::Client,
    options: Arc<IntrospectionOptions>,
}

impl IntrospectionClient {
    /// Create a client from options.
    ///
    /// # Errors
    ///
    /// Returns `IntrospectionError::Configuration` if the HTTP client cannot be built.
    pub fn new(options: IntrospectionOptions) -> Result<Self, IntrospectionError> {
        let http_client = match &options.http_client {
            Some(client) => client.clone(),
            None => reqwest::Client::builder()
                .timeout(options.timeout)
                .build()
                .map_err(|e| {
                    IntrospectionError::Configuration(format!("Failed to build HTTP client: {e}"))
                })?,
        };

        Ok(Self {
            http_client,
            options: Arc::new(options),
        })
    }

    pub fn options(&self) -> &IntrospectionOptions {
        &self.options
    }

    /// Introspect `token` against the endpoint.
    ///
    /// # Errors
    ///
    /// - `Timeout` - the call exceeded the client timeout
    /// - `Transport` - connection or protocol failure
    /// - `UnexpectedStatus` - non-2xx under [`StatusPolicy::RequireSuccess`]
    /// - `Decode` - body is not an introspection response
    #[instrument(skip_all, name = "introspection.client.introspect")]
    pub async fn introspect(&self, token: &str) -> Result<IntrospectionResult, IntrospectionError> {
        self.introspect_with_status(token)
            .await
            .map(|(result, _)| result)
    }

    /// Like [`IntrospectionClient::introspect`], also returning the HTTP
    /// status the result was decoded from. Under
    /// [`StatusPolicy::DecodeAnyStatus`] that status may be non-2xx.
    pub(crate) async fn introspect_with_status(
        &self,
        token: &str,
    ) -> Result<(IntrospectionResult, StatusCode), IntrospectionError> {
        let start = Instant::now();
        let result = self.send(token).await;

        let status = match &result {
            Ok((_, code)) if code.is_success() => "success",
            Ok(_) => "error_body",
            Err(e) => e.kind(),
        };
        metrics::record_introspection_call(status, start.elapsed());

        result
    }

    async fn send(
        &self,
        token: &str,
    ) -> Result<(IntrospectionResult, StatusCode), IntrospectionError> {
        let options = &self.options;

        debug!(
            target: "introspection.client",
            endpoint = %options.endpoint,
            "Sending introspection request"
        );

        let mut request = self
            .http_client
            .post(&options.endpoint)
            .headers(options.headers.clone())
            .form(&options.form_body(token));

        if let Some((client_id, client_secret)) = &options.client_credentials {
            request = request.basic_auth(client_id, Some(client_secret.expose_secret()));
        }

        let response = request.send().await.map_err(|e| {
            let error = IntrospectionError::from(e);
            warn!(target: "introspection.client", kind = error.kind(), error = %error, "Introspection request failed");
            error
        })?;

        let status = response.status();

        if !status.is_success() && options.status_policy == StatusPolicy::RequireSuccess {
            // Body is only logged at trace level
            let body = response.text().await.unwrap_or_else(|e| {
                trace!(target: "introspection.client", error = %e, "Failed to read error response body");
                String::new()
            });
            warn!(
                target: "introspection.client",
                status = %status,
                "Introspection endpoint returned error status"
            );
            trace!(target: "introspection.client", body = %body, "Error response body");
            return Err(IntrospectionError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|e| {
            let error = IntrospectionError::from(e);
            warn!(target: "introspection.client", kind = error.kind(), error = %error, "Failed to read introspection response");
            error
        })?;

        let result: IntrospectionResult = serde_json::from_slice(&bytes).map_err(|e| {
            warn!(
                target: "introspection.client",
                status = %status,
                error = %e,
                "Failed to parse introspection response"
            );
            IntrospectionError::Decode(e.to_string())
        })?;

        debug!(
            target: "introspection.client",
            status = %status,
            active = result.active,
            "Introspection completed"
        );

        Ok((result, status))
    }
}

/// One-shot introspection with the given options.
///
/// Builds a client per call; long-lived callers should hold an
/// [`IntrospectionClient`] instead.
pub async fn introspect(
    token: &str,
    options: &IntrospectionOptions,
) -> Result<IntrospectionResult, IntrospectionError> {
    IntrospectionClient::new(options.clone())?
        .introspect(token)
        .await
}
