//! Introspection response model.
//!
//! Mirrors the RFC 7662 response members. Only `active` is required; every
//! member the model does not name is kept in `extra`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The `aud` member, which servers send either as a string or an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

/// Parsed outcome of a token introspection call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntrospectionResult {
    /// Whether the token is currently active.
    pub active: bool,

    /// Space-separated list of scopes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Client the token was issued to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Human-readable identifier of the resource owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    /// Expiration time (Unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued-at time (Unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Not-before time (Unix seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Subject of the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Members not covered above (vendor claims, metadata).
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl IntrospectionResult {
    /// An active result with no metadata.
    pub fn active() -> Self {
        Self {
            active: true,
            ..Self::default()
        }
    }

    /// An inactive result, as returned for unknown or revoked tokens.
    pub fn inactive() -> Self {
        Self::default()
    }

    /// Iterate over the granted scopes.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scope
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
    }

    /// Returns `true` if `scope` is among the granted scopes.
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes().any(|s| s == scope)
    }

    /// All audiences, regardless of the wire representation.
    pub fn audiences(&self) -> Vec<&str> {
        match &self.aud {
            Some(Audience::One(aud)) => vec![aud.as_str()],
            Some(Audience::Many(auds)) => auds.iter().map(String::as_str).collect(),
            None => Vec::new(),
        }
    }

    /// Returns `true` if `exp` is present and not after `now` (Unix seconds).
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp.is_some_and(|exp| exp <= now)
    }

    /// [`IntrospectionResult::is_expired_at`] against the current wall clock.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Utc::now().timestamp())
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,

    /// "enabled" or "disabled".
    pub cache: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_response() {
        let result: IntrospectionResult = serde_json::from_str(r#"{"active": true}"#).unwrap();

        assert!(result.active);
        assert!(result.scope.is_none());
        assert!(result.extra.is_empty());
        assert_eq!(result, IntrospectionResult::active());
    }

    #[test]
    fn test_inactive_response() {
        let result: IntrospectionResult = serde_json::from_str(r#"{"active": false}"#).unwrap();
        assert_eq!(result, IntrospectionResult::inactive());
    }

    #[test]
    fn test_missing_active_is_rejected() {
        let result = serde_json::from_str::<IntrospectionResult>(r#"{"scope": "read"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_full_response() {
        let json = r#"{
            "active": true,
            "scope": "read write",
            "client_id": "l238j323ds-23ij4",
            "username": "jdoe",
            "token_type": "Bearer",
            "exp": 1419356238,
            "iat": 1419350238,
            "nbf": 1419350238,
            "sub": "Z5O3upPC88QrAjx00dis",
            "aud": "https://protected.example.net/resource",
            "iss": "https://server.example.com/",
            "jti": "abc123",
            "extension_field": "twenty-seven"
        }"#;

        let result: IntrospectionResult = serde_json::from_str(json).unwrap();

        assert!(result.active);
        assert_eq!(result.client_id.as_deref(), Some("l238j323ds-23ij4"));
        assert_eq!(result.username.as_deref(), Some("jdoe"));
        assert_eq!(result.exp, Some(1419356238));
        assert_eq!(
            result.audiences(),
            vec!["https://protected.example.net/resource"]
        );
        assert_eq!(
            result.extra.get("extension_field"),
            Some(&serde_json::json!("twenty-seven"))
        );
    }

    #[test]
    fn test_audience_array() {
        let result: IntrospectionResult =
            serde_json::from_str(r#"{"active": true, "aud": ["api", "admin"]}"#).unwrap();
        assert_eq!(result.audiences(), vec!["api", "admin"]);
    }

    #[test]
    fn test_scopes() {
        let result: IntrospectionResult =
            serde_json::from_str(r#"{"active": true, "scope": "read  write admin"}"#).unwrap();

        assert_eq!(result.scopes().collect::<Vec<_>>(), vec!["read", "write", "admin"]);
        assert!(result.has_scope("write"));
        assert!(!result.has_scope("delete"));
        assert!(!IntrospectionResult::active().has_scope("read"));
    }

    #[test]
    fn test_expiry() {
        let result = IntrospectionResult {
            active: true,
            exp: Some(1_000),
            ..IntrospectionResult::default()
        };

        assert!(!result.is_expired_at(999));
        assert!(result.is_expired_at(1_000));
        assert!(result.is_expired_at(2_000));
        assert!(!IntrospectionResult::active().is_expired_at(i64::MAX));
    }

    #[test]
    fn test_is_expired_uses_wall_clock() {
        let now = chrono::Utc::now().timestamp();
        let expired = IntrospectionResult {
            active: true,
            exp: Some(now - 60),
            ..IntrospectionResult::default()
        };
        let valid = IntrospectionResult {
            active: true,
            exp: Some(now + 3600),
            ..IntrospectionResult::default()
        };

        assert!(expired.is_expired());
        assert!(!valid.is_expired());
        assert!(!IntrospectionResult::active().is_expired());
    }

    #[test]
    fn test_serialization_omits_absent_members() {
        let json = serde_json::to_value(IntrospectionResult::active()).unwrap();
        assert_eq!(json, serde_json::json!({"active": true}));
    }
}
