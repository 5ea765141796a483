//! Cache that records its traffic.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use token_introspection::{InMemoryCache, IntrospectionCache, IntrospectionResult};

/// One `store` call seen by [`RecordingCache`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEntry {
    pub token: String,
    pub result: IntrospectionResult,
    pub ttl: Duration,
}

/// In-memory cache that also records every `get` and `store`.
#[derive(Clone, Default)]
pub struct RecordingCache {
    inner: InMemoryCache,
    gets: Arc<Mutex<Vec<String>>>,
    stores: Arc<Mutex<Vec<StoredEntry>>>,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate without recording.
    pub async fn seed(&self, token: &str, result: IntrospectionResult) {
        self.inner
            .store(token, result, Duration::from_secs(3600))
            .await;
    }

    /// Tokens passed to `get`, in order.
    pub fn gets(&self) -> Vec<String> {
        self.gets.lock().unwrap().clone()
    }

    /// Calls to `store`, in order.
    pub fn stores(&self) -> Vec<StoredEntry> {
        self.stores.lock().unwrap().clone()
    }
}

#[async_trait]
impl IntrospectionCache for RecordingCache {
    async fn get(&self, token: &str) -> Option<IntrospectionResult> {
        self.gets.lock().unwrap().push(token.to_string());
        self.inner.get(token).await
    }

    async fn store(&self, token: &str, result: IntrospectionResult, ttl: Duration) {
        self.stores.lock().unwrap().push(StoredEntry {
            token: token.to_string(),
            result: result.clone(),
            ttl,
        });
        self.inner.store(token, result, ttl).await;
    }
}
