//! Request builders.

use axum::body::Body;
use axum::http::header::AUTHORIZATION;
use axum::http::Request;

/// `GET {uri}` with `Authorization: Bearer {token}`.
pub fn bearer_request(uri: &str, token: &str) -> Request<Body> {
    request_with_authorization(uri, &format!("Bearer {}", token))
}

/// `GET {uri}` with a raw Authorization header value.
pub fn request_with_authorization(uri: &str, value: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, value)
        .body(Body::empty())
        .unwrap()
}

/// `GET {uri}` without an Authorization header.
pub fn anonymous_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}
