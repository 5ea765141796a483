//! Service configuration.
//!
//! Configuration is loaded from environment variables. The client secret is
//! redacted in Debug output.

use crate::cache::InMemoryCache;
use crate::options::{IntrospectionOptions, StatusPolicy, DEFAULT_HTTP_TIMEOUT, DEFAULT_TOKEN_TYPE_HINT};
use secrecy::SecretString;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Upper bound for the introspection timeout in milliseconds.
pub const MAX_TIMEOUT_MS: u64 = 60_000;

/// Service configuration.
#[derive(Clone)]
pub struct Config {
    /// Introspection endpoint URL.
    pub introspection_endpoint: String,

    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Timeout for the introspection call.
    pub introspection_timeout: Duration,

    /// `token_type_hint` sent with every call.
    pub token_type_hint: String,

    /// Client ID for HTTP Basic authentication to the endpoint.
    pub client_id: Option<String>,

    /// Client secret for HTTP Basic authentication to the endpoint.
    pub client_secret: Option<SecretString>,

    /// Cache TTL in seconds. 0 disables the cache.
    pub cache_ttl_seconds: u64,

    /// Decode response bodies regardless of HTTP status.
    pub accept_error_bodies: bool,
}

/// Custom Debug implementation that redacts the client secret.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("introspection_endpoint", &self.introspection_endpoint)
            .field("bind_address", &self.bind_address)
            .field("introspection_timeout", &self.introspection_timeout)
            .field("token_type_hint", &self.token_type_hint)
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("cache_ttl_seconds", &self.cache_ttl_seconds)
            .field("accept_error_bodies", &self.accept_error_bodies)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid introspection timeout configuration: {0}")]
    InvalidTimeout(String),

    #[error("Invalid cache TTL configuration: {0}")]
    InvalidCacheTtl(String),

    #[error("Invalid client credentials configuration: {0}")]
    InvalidClientCredentials(String),

    #[error("Invalid boolean configuration: {0}")]
    InvalidFlag(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let introspection_endpoint = vars
            .get("INTROSPECTION_ENDPOINT")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("INTROSPECTION_ENDPOINT".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        // Parse introspection timeout with validation
        let introspection_timeout = if let Some(value_str) = vars.get("INTROSPECTION_TIMEOUT_MS") {
            let value: u64 = value_str.parse().map_err(|e| {
                ConfigError::InvalidTimeout(format!(
                    "INTROSPECTION_TIMEOUT_MS must be a valid positive integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value == 0 {
                return Err(ConfigError::InvalidTimeout(
                    "INTROSPECTION_TIMEOUT_MS must be greater than 0".to_string(),
                ));
            }

            if value > MAX_TIMEOUT_MS {
                return Err(ConfigError::InvalidTimeout(format!(
                    "INTROSPECTION_TIMEOUT_MS must not exceed {}, got {}",
                    MAX_TIMEOUT_MS, value
                )));
            }

            Duration::from_millis(value)
        } else {
            DEFAULT_HTTP_TIMEOUT
        };

        let token_type_hint = vars
            .get("INTROSPECTION_TOKEN_TYPE_HINT")
            .cloned()
            .unwrap_or_else(|| DEFAULT_TOKEN_TYPE_HINT.to_string());

        // Client credentials come as a pair
        let client_id = vars.get("INTROSPECTION_CLIENT_ID").cloned();
        let client_secret = vars
            .get("INTROSPECTION_CLIENT_SECRET")
            .map(|s| SecretString::from(s.clone()));

        if client_id.is_some() != client_secret.is_some() {
            return Err(ConfigError::InvalidClientCredentials(
                "INTROSPECTION_CLIENT_ID and INTROSPECTION_CLIENT_SECRET must be set together"
                    .to_string(),
            ));
        }

        let cache_ttl_seconds = match vars.get("INTROSPECTION_CACHE_TTL_SECONDS") {
            Some(value_str) => value_str.parse().map_err(|e| {
                ConfigError::InvalidCacheTtl(format!(
                    "INTROSPECTION_CACHE_TTL_SECONDS must be a valid non-negative integer, got '{}': {}",
                    value_str, e
                ))
            })?,
            None => 0,
        };

        let accept_error_bodies = match vars.get("INTROSPECTION_ACCEPT_ERROR_BODIES") {
            Some(value_str) => parse_flag("INTROSPECTION_ACCEPT_ERROR_BODIES", value_str)?,
            None => false,
        };

        Ok(Config {
            introspection_endpoint,
            bind_address,
            introspection_timeout,
            token_type_hint,
            client_id,
            client_secret,
            cache_ttl_seconds,
            accept_error_bodies,
        })
    }

    /// Whether results are cached.
    pub fn cache_enabled(&self) -> bool {
        self.cache_ttl_seconds > 0
    }

    /// Build introspection options. An in-memory cache is attached when
    /// caching is enabled.
    pub fn to_options(&self) -> IntrospectionOptions {
        let mut options = IntrospectionOptions::new(self.introspection_endpoint.clone())
            .with_timeout(self.introspection_timeout)
            .with_token_type_hint(self.token_type_hint.clone());

        if let (Some(client_id), Some(client_secret)) = (&self.client_id, &self.client_secret) {
            options = options.with_basic_auth(client_id.clone(), client_secret.clone());
        }

        if self.cache_enabled() {
            options = options
                .with_cache(InMemoryCache::new())
                .with_cache_ttl(Duration::from_secs(self.cache_ttl_seconds));
        }

        if self.accept_error_bodies {
            options = options.with_status_policy(StatusPolicy::DecodeAnyStatus);
        }

        options
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag(format!(
            "{} must be a boolean, got '{}'",
            name, value
        ))),
    }
}
