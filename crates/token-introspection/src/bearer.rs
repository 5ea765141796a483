//! Bearer credential extraction.
//!
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! The scheme prefix is matched case-sensitively with a single space, and the
//! remainder is returned untouched.

use http::{header::AUTHORIZATION, HeaderMap};

/// Authorization scheme prefix, including the separating space.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Strip the bearer prefix from an `Authorization` header value.
pub fn strip_bearer(value: &str) -> Option<&str> {
    value.strip_prefix(BEARER_PREFIX)
}

/// Extract the bearer token from request headers.
///
/// Returns `None` when the header is missing, is not visible ASCII, or uses a
/// scheme other than `Bearer`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        tracing::debug!(target: "introspection.bearer", "Missing Authorization header");
        return None;
    };

    let Ok(value) = value.to_str() else {
        tracing::debug!(target: "introspection.bearer", "Authorization header is not valid ASCII");
        return None;
    };

    let token = strip_bearer(value);
    if token.is_none() {
        tracing::debug!(target: "introspection.bearer", "Authorization header is not a bearer token");
    }
    token
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extracts_token() {
        let headers = headers_with("Bearer abc123");
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_wrong_scheme() {
        assert_eq!(bearer_token(&headers_with("Token abc123")), None);
        assert_eq!(bearer_token(&headers_with("Basic dXNlcjpwYXNz")), None);
    }

    #[test]
    fn test_scheme_is_case_sensitive() {
        assert_eq!(bearer_token(&headers_with("bearer abc123")), None);
        assert_eq!(bearer_token(&headers_with("BEARER abc123")), None);
    }

    #[test]
    fn test_requires_single_space_separator() {
        assert_eq!(bearer_token(&headers_with("Bearerabc123")), None);
        // A second space becomes part of the token
        assert_eq!(bearer_token(&headers_with("Bearer  abc123")), Some(" abc123"));
    }

    #[test]
    fn test_token_is_not_trimmed() {
        assert_eq!(strip_bearer("Bearer abc 123"), Some("abc 123"));
    }

    #[test]
    fn test_empty_token_after_prefix() {
        assert_eq!(strip_bearer("Bearer "), Some(""));
        assert_eq!(strip_bearer("Bearer"), None);
    }

    #[test]
    fn test_non_ascii_header_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap(),
        );
        assert_eq!(bearer_token(&headers), None);
    }
}
