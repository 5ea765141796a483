//! Introspection error types.
//!
//! Every per-request failure is captured in the request's outcome rather than
//! turned into a response by the middleware. The `IntoResponse` impl exists
//! for downstream handlers that decide to reject a request; messages returned
//! to clients are generic and the underlying cause is logged server-side.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Introspection error type.
///
/// Cloneable so a single outcome can be handed to any number of downstream
/// readers of the request extensions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntrospectionError {
    /// The request carried no `Authorization: Bearer <token>` header.
    #[error("no bearer")]
    NoBearer,

    /// The outcome was looked up on a request the middleware never saw.
    #[error("introspection middleware didn't execute")]
    NoMiddleware,

    /// The introspection call did not complete within the client timeout.
    #[error("Introspection request timed out: {0}")]
    Timeout(String),

    /// The introspection call failed at the network layer.
    #[error("Introspection transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status.
    #[error("Introspection endpoint returned status {status}")]
    UnexpectedStatus { status: u16, body: String },

    /// The response body is not a valid introspection response.
    #[error("Invalid introspection response: {0}")]
    Decode(String),

    /// The introspection options could not be turned into a client.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl IntrospectionError {
    /// Returns `true` if the remote call hit the client deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, IntrospectionError::Timeout(_))
    }

    /// Returns `true` for failures of the remote call itself
    /// (timeout, network, or status), as opposed to credential or wiring errors.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            IntrospectionError::Timeout(_)
                | IntrospectionError::Transport(_)
                | IntrospectionError::UnexpectedStatus { .. }
        )
    }

    /// Bounded label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            IntrospectionError::NoBearer => "no_bearer",
            IntrospectionError::NoMiddleware => "no_middleware",
            IntrospectionError::Timeout(_) => "timeout",
            IntrospectionError::Transport(_) => "transport",
            IntrospectionError::UnexpectedStatus { .. } => "unexpected_status",
            IntrospectionError::Decode(_) => "decode",
            IntrospectionError::Configuration(_) => "configuration",
        }
    }

    /// Returns the HTTP status code a rejecting handler should use.
    pub fn status_code(&self) -> u16 {
        match self {
            IntrospectionError::NoBearer => 401,
            IntrospectionError::Timeout(_)
            | IntrospectionError::Transport(_)
            | IntrospectionError::UnexpectedStatus { .. }
            | IntrospectionError::Decode(_) => 503,
            IntrospectionError::NoMiddleware | IntrospectionError::Configuration(_) => 500,
        }
    }
}

impl From<reqwest::Error> for IntrospectionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            IntrospectionError::Timeout(err.to_string())
        } else if err.is_decode() {
            IntrospectionError::Decode(err.to_string())
        } else {
            IntrospectionError::Transport(err.to_string())
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for IntrospectionError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let (code, message) = match &self {
            IntrospectionError::NoBearer => ("INVALID_TOKEN", "Missing or malformed bearer token"),
            IntrospectionError::Timeout(_)
            | IntrospectionError::Transport(_)
            | IntrospectionError::UnexpectedStatus { .. }
            | IntrospectionError::Decode(_) => {
                // Log actual reason server-side
                tracing::warn!(
                    target: "introspection.errors",
                    kind = self.kind(),
                    error = %self,
                    "Token introspection unavailable"
                );
                ("SERVICE_UNAVAILABLE", "Authentication service unavailable")
            }
            IntrospectionError::NoMiddleware | IntrospectionError::Configuration(_) => {
                tracing::error!(target: "introspection.errors", error = %self, "Introspection wiring error");
                ("INTERNAL_ERROR", "An internal error occurred")
            }
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: message.to_string(),
            },
        };

        let mut response = (status, Json(error_response)).into_response();

        // Add WWW-Authenticate header for 401 responses
        if status == StatusCode::UNAUTHORIZED {
            if let Ok(header_value) = "Bearer error=\"invalid_token\"".parse() {
                response
                    .headers_mut()
                    .insert("WWW-Authenticate", header_value);
            }
        }

        response
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;

    async fn read_body_json(body: Body) -> serde_json::Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_display_matches_sentinel_messages() {
        assert_eq!(IntrospectionError::NoBearer.to_string(), "no bearer");
        assert_eq!(
            IntrospectionError::NoMiddleware.to_string(),
            "introspection middleware didn't execute"
        );
    }

    #[test]
    fn test_display_unexpected_status() {
        let error = IntrospectionError::UnexpectedStatus {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Introspection endpoint returned status 502"
        );
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(IntrospectionError::NoBearer.kind(), "no_bearer");
        assert_eq!(IntrospectionError::NoMiddleware.kind(), "no_middleware");
        assert_eq!(IntrospectionError::Timeout(String::new()).kind(), "timeout");
        assert_eq!(
            IntrospectionError::Transport(String::new()).kind(),
            "transport"
        );
        assert_eq!(IntrospectionError::Decode(String::new()).kind(), "decode");
    }

    #[test]
    fn test_error_classification() {
        assert!(IntrospectionError::Timeout("deadline".into()).is_timeout());
        assert!(IntrospectionError::Timeout("deadline".into()).is_transport());
        assert!(IntrospectionError::Transport("refused".into()).is_transport());
        assert!(!IntrospectionError::Transport("refused".into()).is_timeout());
        assert!(!IntrospectionError::NoBearer.is_transport());
        assert!(!IntrospectionError::Decode("eof".into()).is_transport());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(IntrospectionError::NoBearer.status_code(), 401);
        assert_eq!(IntrospectionError::NoMiddleware.status_code(), 500);
        assert_eq!(IntrospectionError::Timeout(String::new()).status_code(), 503);
        assert_eq!(
            IntrospectionError::Configuration(String::new()).status_code(),
            500
        );
    }

    #[tokio::test]
    async fn test_no_bearer_response_has_www_authenticate() {
        let response = IntrospectionError::NoBearer.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let auth_header = response.headers().get("WWW-Authenticate").unwrap();
        assert_eq!(auth_header.to_str().unwrap(), "Bearer error=\"invalid_token\"");

        let body = read_body_json(response.into_body()).await;
        assert_eq!(body["error"]["code"], "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn test_upstream_failure_hides_details() {
        let response =
            IntrospectionError::Transport("connection refused to 10.0.0.1".into()).into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(response.headers().get("WWW-Authenticate").is_none());

        let body = read_body_json(response.into_body()).await;
        assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
        assert!(!body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("10.0.0.1"));
    }

    #[test]
    fn test_response_status_matches_status_code() {
        let errors = [
            IntrospectionError::NoBearer,
            IntrospectionError::NoMiddleware,
            IntrospectionError::Timeout(String::new()),
            IntrospectionError::Decode(String::new()),
            IntrospectionError::Configuration(String::new()),
        ];

        for error in errors {
            let expected = error.status_code();
            assert_eq!(error.into_response().status().as_u16(), expected);
        }
    }

    #[tokio::test]
    async fn test_no_middleware_is_internal_error() {
        let response = IntrospectionError::NoMiddleware.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
