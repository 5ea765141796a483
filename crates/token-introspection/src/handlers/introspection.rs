//! Introspection echo handler.
//!
//! Returns the outcome the middleware attached to the request. Active and
//! inactive results are both returned as 200 so callers can see what the
//! introspection endpoint said; failures map through `IntrospectionError`.

use crate::errors::IntrospectionError;
use crate::middleware::Introspected;
use crate::models::IntrospectionResult;
use axum::Json;
use tracing::instrument;

/// Handler for GET /v1/introspection
#[instrument(skip_all, name = "introspection.echo")]
pub async fn echo_introspection(
    introspected: Introspected,
) -> Result<Json<IntrospectionResult>, IntrospectionError> {
    let result = introspected.into_inner()?;

    tracing::debug!(
        target: "introspection.handlers",
        active = result.active,
        expired = result.is_expired(),
        "Echoing introspection result"
    );

    Ok(Json(result))
}
