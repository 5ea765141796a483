//! Introspection options.
//!
//! Built once at startup and shared read-only by every request:
//!
//! ```rust,ignore
//! use secrecy::SecretString;
//! use token_introspection::{InMemoryCache, IntrospectionOptions};
//! use std::time::Duration;
//!
//! let options = IntrospectionOptions::new("https://auth.example.com/oauth/introspect")
//!     .with_basic_auth("resource-server", SecretString::from("secret"))
//!     .with_cache(InMemoryCache::new())
//!     .with_cache_ttl(Duration::from_secs(60));
//! ```

use crate::cache::IntrospectionCache;
use http::header::{HeaderName, ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue};
use secrecy::SecretString;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Default HTTP request timeout for the introspection call.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(2);

/// Default lifetime of cached results.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Default `token_type_hint` form field.
pub const DEFAULT_TOKEN_TYPE_HINT: &str = "access_token";

/// Form field overwritten with the presented token on every call.
pub const TOKEN_FIELD: &str = "token";

/// Form field carrying the token type hint.
pub const TOKEN_TYPE_HINT_FIELD: &str = "token_type_hint";

/// How non-2xx responses from the endpoint are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPolicy {
    /// Any non-success status is an error.
    #[default]
    RequireSuccess,

    /// Decode the body whatever the status; only a decode failure is an error.
    DecodeAnyStatus,
}

/// Configuration for token introspection.
#[derive(Clone)]
pub struct IntrospectionOptions {
    /// Introspection endpoint URL, used verbatim.
    pub(crate) endpoint: String,

    /// Caller-supplied HTTP client. Built from `timeout` when absent.
    pub(crate) http_client: Option<reqwest::Client>,

    /// HTTP request timeout for a client built by this crate.
    pub(crate) timeout: Duration,

    /// Form body template. `token` is overwritten per call.
    pub(crate) body: BTreeMap<String, String>,

    /// Request header template.
    pub(crate) headers: HeaderMap,

    /// HTTP Basic client authentication.
    pub(crate) client_credentials: Option<(String, SecretString)>,

    pub(crate) cache: Option<Arc<dyn IntrospectionCache>>,

    pub(crate) cache_ttl: Duration,

    pub(crate) status_policy: StatusPolicy,
}

impl std::fmt::Debug for IntrospectionOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntrospectionOptions")
            .field("endpoint", &self.endpoint)
            .field("custom_http_client", &self.http_client.is_some())
            .field("timeout", &self.timeout)
            .field("body", &self.body)
            .field("headers", &self.headers)
            .field(
                "client_id",
                &self.client_credentials.as_ref().map(|(id, _)| id),
            )
            .field(
                "client_secret",
                &self.client_credentials.as_ref().map(|_| "[REDACTED]"),
            )
            .field("cache_enabled", &self.cache.is_some())
            .field("cache_ttl", &self.cache_ttl)
            .field("status_policy", &self.status_policy)
            .finish()
    }
}

impl IntrospectionOptions {
    /// Create options for `endpoint` with the defaults:
    /// 2 second timeout, `token_type_hint=access_token`, form/JSON headers,
    /// no cache.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        let body = BTreeMap::from([
            (TOKEN_FIELD.to_string(), String::new()),
            (
                TOKEN_TYPE_HINT_FIELD.to_string(),
                DEFAULT_TOKEN_TYPE_HINT.to_string(),
            ),
        ]);

        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Self {
            endpoint: endpoint.into(),
            http_client: None,
            timeout: DEFAULT_HTTP_TIMEOUT,
            body,
            headers,
            client_credentials: None,
            cache: None,
            cache_ttl: DEFAULT_CACHE_TTL,
            status_policy: StatusPolicy::default(),
        }
    }

    /// Use a caller-built HTTP client. Its own timeout applies and
    /// [`IntrospectionOptions::with_timeout`] is ignored.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Set the HTTP timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set one form field of the body template.
    #[must_use]
    pub fn with_body_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.body.insert(name.into(), value.into());
        self
    }

    /// Replace the body template. A `token` field is always sent.
    #[must_use]
    pub fn with_body(mut self, body: BTreeMap<String, String>) -> Self {
        self.body = body;
        self
    }

    /// Set the `token_type_hint` form field.
    #[must_use]
    pub fn with_token_type_hint(self, hint: impl Into<String>) -> Self {
        self.with_body_field(TOKEN_TYPE_HINT_FIELD, hint)
    }

    /// Set one header of the header template.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Replace the header template.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Authenticate to the endpoint with HTTP Basic client credentials.
    #[must_use]
    pub fn with_basic_auth(mut self, client_id: impl Into<String>, client_secret: SecretString) -> Self {
        self.client_credentials = Some((client_id.into(), client_secret));
        self
    }

    /// Enable result caching.
    #[must_use]
    pub fn with_cache<C: IntrospectionCache>(mut self, cache: C) -> Self {
        self.cache = Some(Arc::new(cache));
        self
    }

    /// Set how long successful results are cached.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Set how non-2xx responses are treated.
    #[must_use]
    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.status_policy = policy;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    pub fn status_policy(&self) -> StatusPolicy {
        self.status_policy
    }

    /// Form body for `token`: the template with `token` overwritten.
    pub(crate) fn form_body(&self, token: &str) -> BTreeMap<String, String> {
        let mut body = self.body.clone();
        body.insert(TOKEN_FIELD.to_string(), token.to_string());
        body
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCache;

    #[test]
    fn test_defaults() {
        let options = IntrospectionOptions::new("http://localhost:8082/introspect");

        assert_eq!(options.endpoint(), "http://localhost:8082/introspect");
        assert_eq!(options.timeout(), Duration::from_secs(2));
        assert_eq!(options.cache_ttl(), DEFAULT_CACHE_TTL);
        assert!(!options.cache_enabled());
        assert_eq!(options.status_policy(), StatusPolicy::RequireSuccess);
        assert_eq!(
            options.headers.get(CONTENT_TYPE).unwrap(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(options.headers.get(ACCEPT).unwrap(), "application/json");
        assert_eq!(
            options.body.get(TOKEN_TYPE_HINT_FIELD).map(String::as_str),
            Some("access_token")
        );
    }

    #[test]
    fn test_builder() {
        let options = IntrospectionOptions::new("http://localhost:8082/introspect")
            .with_timeout(Duration::from_millis(500))
            .with_token_type_hint("refresh_token")
            .with_body_field("client_id", "rs")
            .with_header(
                HeaderName::from_static("x-request-source"),
                HeaderValue::from_static("gateway"),
            )
            .with_cache(InMemoryCache::new())
            .with_cache_ttl(Duration::from_secs(30))
            .with_status_policy(StatusPolicy::DecodeAnyStatus);

        assert_eq!(options.timeout(), Duration::from_millis(500));
        assert_eq!(
            options.body.get(TOKEN_TYPE_HINT_FIELD).map(String::as_str),
            Some("refresh_token")
        );
        assert_eq!(options.body.get("client_id").map(String::as_str), Some("rs"));
        assert_eq!(options.headers.get("x-request-source").unwrap(), "gateway");
        assert!(options.cache_enabled());
        assert_eq!(options.cache_ttl(), Duration::from_secs(30));
        assert_eq!(options.status_policy(), StatusPolicy::DecodeAnyStatus);
    }

    #[test]
    fn test_form_body_overwrites_token_only() {
        let options = IntrospectionOptions::new("http://localhost/introspect")
            .with_body_field("client_id", "rs");

        let body = options.form_body("abc123");

        assert_eq!(body.get(TOKEN_FIELD).map(String::as_str), Some("abc123"));
        assert_eq!(
            body.get(TOKEN_TYPE_HINT_FIELD).map(String::as_str),
            Some("access_token")
        );
        assert_eq!(body.get("client_id").map(String::as_str), Some("rs"));
        // Template is untouched
        assert_eq!(options.body.get(TOKEN_FIELD).map(String::as_str), Some(""));
    }

    #[test]
    fn test_form_body_adds_token_to_replaced_template() {
        let options = IntrospectionOptions::new("http://localhost/introspect")
            .with_body(BTreeMap::from([("resource".to_string(), "api".to_string())]));

        let body = options.form_body("abc123");

        assert_eq!(body.len(), 2);
        assert_eq!(body.get(TOKEN_FIELD).map(String::as_str), Some("abc123"));
        assert!(body.get(TOKEN_TYPE_HINT_FIELD).is_none());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let options = IntrospectionOptions::new("http://localhost/introspect")
            .with_basic_auth("rs", SecretString::from("super-secret-value"));

        let debug_str = format!("{options:?}");
        assert!(debug_str.contains("[REDACTED]"));
        assert!(debug_str.contains("\"rs\""));
        assert!(!debug_str.contains("super-secret-value"));
    }
}
