//! Token introspection middleware.
//!
//! Extracts the bearer token from the Authorization header, consults the
//! cache, introspects the token if needed, and stores the outcome in the
//! request extensions. The inner service is always called; the middleware
//! never produces a response of its own.
//!
//! Handlers read the outcome with [`from_request`], [`from_parts`],
//! [`from_extensions`] or the [`Introspected`] extractor, and decide for
//! themselves whether to reject.

use crate::bearer::bearer_token;
use crate::client::IntrospectionClient;
use crate::errors::IntrospectionError;
use crate::models::IntrospectionResult;
use crate::observability::metrics;
use crate::options::IntrospectionOptions;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, Extensions, HeaderMap, Request};
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::instrument;

/// Per-request outcome as stored in the request extensions.
///
/// Private so that only this module can set or read it.
#[derive(Clone)]
struct OutcomeSlot(Arc<Result<IntrospectionResult, IntrospectionError>>);

/// Run the introspection pipeline for one request.
///
/// 1. No bearer token: `Err(NoBearer)` without any remote call.
/// 2. Cache hit: the cached result.
/// 3. Otherwise the endpoint is called; successful results are cached.
#[instrument(skip_all, name = "introspection.middleware.resolve")]
pub async fn resolve_outcome(
    client: &IntrospectionClient,
    headers: &HeaderMap,
) -> Result<IntrospectionResult, IntrospectionError> {
    let Some(token) = bearer_token(headers) else {
        return Err(IntrospectionError::NoBearer);
    };

    let options = client.options();

    if let Some(cache) = &options.cache {
        if let Some(cached) = cache.get(token).await {
            tracing::debug!(target: "introspection.middleware", active = cached.active, "Introspection cache hit");
            metrics::record_cache_lookup(true);
            return Ok(cached);
        }
        metrics::record_cache_lookup(false);
    }

    let (result, status) = client.introspect_with_status(token).await?;

    // Failures are never cached, including error bodies decoded under
    // StatusPolicy::DecodeAnyStatus
    if let Some(cache) = &options.cache {
        if status.is_success() {
            cache.store(token, result.clone(), options.cache_ttl).await;
            tracing::trace!(
                target: "introspection.middleware",
                ttl_secs = options.cache_ttl.as_secs(),
                "Introspection result cached"
            );
        } else {
            tracing::debug!(
                target: "introspection.middleware",
                status = %status,
                "Result decoded from error status, not cached"
            );
        }
    }

    Ok(result)
}

/// Read the outcome from request extensions.
///
/// Returns `Err(NoMiddleware)` if the introspection middleware did not run
/// for this request.
pub fn from_extensions(extensions: &Extensions) -> Result<IntrospectionResult, IntrospectionError> {
    match extensions.get::<OutcomeSlot>() {
        Some(OutcomeSlot(outcome)) => outcome.as_ref().clone(),
        None => Err(IntrospectionError::NoMiddleware),
    }
}

/// Read the outcome from a request.
pub fn from_request<B>(req: &Request<B>) -> Result<IntrospectionResult, IntrospectionError> {
    from_extensions(req.extensions())
}

/// Read the outcome from request parts.
pub fn from_parts(parts: &Parts) -> Result<IntrospectionResult, IntrospectionError> {
    from_extensions(&parts.extensions)
}

/// Axum extractor for the introspection outcome. Never rejects.
///
/// ```rust,ignore
/// async fn handler(Introspected(outcome): Introspected) -> Response {
///     match outcome {
///         Ok(result) if result.active => "welcome".into_response(),
///         Ok(_) => StatusCode::UNAUTHORIZED.into_response(),
///         Err(e) => e.into_response(),
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Introspected(pub Result<IntrospectionResult, IntrospectionError>);

impl Introspected {
    pub fn into_inner(self) -> Result<IntrospectionResult, IntrospectionError> {
        self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Introspected
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(from_parts(parts)))
    }
}

/// Tower layer that decorates requests with their introspection outcome.
#[derive(Clone, Debug)]
pub struct IntrospectionLayer {
    client: IntrospectionClient,
}

impl IntrospectionLayer {
    pub fn new(client: IntrospectionClient) -> Self {
        Self { client }
    }

    /// Build the client from options and wrap it in a layer.
    ///
    /// # Errors
    ///
    /// Returns `IntrospectionError::Configuration` if the HTTP client cannot be built.
    pub fn from_options(options: IntrospectionOptions) -> Result<Self, IntrospectionError> {
        Ok(Self::new(IntrospectionClient::new(options)?))
    }
}

impl<S> Layer<S> for IntrospectionLayer {
    type Service = IntrospectionService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        IntrospectionService {
            inner,
            client: self.client.clone(),
        }
    }
}

/// Service produced by [`IntrospectionLayer`].
#[derive(Clone, Debug)]
pub struct IntrospectionService<S> {
    inner: S,
    client: IntrospectionClient,
}

impl<S, ReqBody> Service<Request<ReqBody>> for IntrospectionService<S>
where
    S: Service<Request<ReqBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        // Take the service that poll_ready drove to readiness
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let client = self.client.clone();

        Box::pin(async move {
            let outcome = resolve_outcome(&client, req.headers()).await;

            if let Err(e) = &outcome {
                tracing::debug!(target: "introspection.middleware", kind = e.kind(), "Introspection did not produce a result");
            }
            metrics::record_outcome(&outcome);

            req.extensions_mut().insert(OutcomeSlot(Arc::new(outcome)));

            inner.call(req).await
        })
    }
}
