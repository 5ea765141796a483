//! In-process introspection cache.
//!
//! Backed by a `HashMap` behind a `tokio::sync::RwLock`. There is no capacity
//! limit; expired entries are dropped when they are next looked up.

use super::IntrospectionCache;
use crate::models::IntrospectionResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Cached result with expiry time.
struct CachedResult {
    result: IntrospectionResult,

    /// When this cache entry expires.
    expires_at: Instant,
}

/// In-memory [`IntrospectionCache`]. Cheap to clone; clones share entries.
#[derive(Clone, Default)]
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<String, CachedResult>>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Remove every entry.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

impl std::fmt::Debug for InMemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Keys are bearer tokens
        f.debug_struct("InMemoryCache").finish_non_exhaustive()
    }
}

#[async_trait]
impl IntrospectionCache for InMemoryCache {
    async fn get(&self, token: &str) -> Option<IntrospectionResult> {
        {
            let entries = self.entries.read().await;
            match entries.get(token) {
                Some(cached) if cached.expires_at > Instant::now() => {
                    return Some(cached.result.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }

        // Expired - evict unless a concurrent store refreshed it
        let mut entries = self.entries.write().await;
        if entries
            .get(token)
            .is_some_and(|cached| cached.expires_at <= Instant::now())
        {
            entries.remove(token);
            tracing::trace!(target: "introspection.cache", "Evicted expired entry");
        }
        None
    }

    async fn store(&self, token: &str, result: IntrospectionResult, ttl: Duration) {
        let Some(expires_at) = Instant::now().checked_add(ttl) else {
            tracing::warn!(target: "introspection.cache", ttl_secs = ttl.as_secs(), "Cache TTL overflows, entry not stored");
            return;
        };

        self.entries
            .write()
            .await
            .insert(token.to_string(), CachedResult { result, expires_at });
    }
}
