//! Introspection result cache capability.
//!
//! The middleware only ever calls [`IntrospectionCache::get`] and
//! [`IntrospectionCache::store`]; what backs them is up to the caller.
//! Implementations must tolerate concurrent calls from many requests.

use crate::models::IntrospectionResult;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub mod in_memory;

pub use in_memory::InMemoryCache;

/// Token-keyed store of introspection results.
#[async_trait]
pub trait IntrospectionCache: Send + Sync + 'static {
    /// Look up a token. `None` means not cached or expired.
    async fn get(&self, token: &str) -> Option<IntrospectionResult>;

    /// Store a result for `ttl`. Best-effort: failures are handled (or
    /// logged) by the implementation and never reported to the caller.
    async fn store(&self, token: &str, result: IntrospectionResult, ttl: Duration);
}

#[async_trait]
impl<T> IntrospectionCache for Arc<T>
where
    T: IntrospectionCache + ?Sized,
{
    async fn get(&self, token: &str) -> Option<IntrospectionResult> {
        (**self).get(token).await
    }

    async fn store(&self, token: &str, result: IntrospectionResult, ttl: Duration) {
        (**self).store(token, result, ttl).await
    }
}
