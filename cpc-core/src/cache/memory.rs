use std::num::NonZeroUsize;
use std::time::Duration;

use async_trait::async_trait;
use cpc_types::CpcError;
use lru::LruCache;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::CacheBackend;

struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// In-process backend: an LRU map whose entries carry their own expiry.
///
/// Expiry is measured on the Tokio clock, so paused-time tests can advance
/// past a TTL without sleeping.
pub struct MemoryBackend {
    inner: Mutex<LruCache<String, Entry>>,
}

impl MemoryBackend {
    /// Default number of entries kept before least-recently-used eviction.
    pub const DEFAULT_CAPACITY: usize = 50_000;

    /// Create a backend holding at most `capacity` entries (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(cap)),
        }
    }

    /// Number of stored entries, live or not yet evicted.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// True when nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CpcError> {
        let now = Instant::now();
        let mut guard = self.inner.lock().await;
        if let Some(entry) = guard.get(key)
            && entry.is_live(now)
        {
            return Ok(Some(entry.value.clone()));
        }
        guard.pop(key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CpcError> {
        let expires_at = Instant::now() + ttl;
        self.inner
            .lock()
            .await
            .put(key.to_string(), Entry { value, expires_at });
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, CpcError> {
        let now = Instant::now();
        let mut guard = self.inner.lock().await;
        let live = guard.peek(key).is_some_and(|e| e.is_live(now));
        if !live {
            guard.pop(key);
        }
        Ok(live)
    }
}
