//! In-memory cache implementation using the moka crate.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use identity_core::config::CacheConfig;
use identity_core::result::AppResult;
use identity_core::traits::cache::CacheProvider;

use super::expiry::{PerEntryTtl, TimedEntry};

/// In-memory cache provider using moka.
///
/// Each entry expires after the TTL given when it was written. Writes and
/// lookups touch one key only; moka shards internally so concurrent callers
/// working on different keys do not contend.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    /// The underlying moka cache.
    cache: Cache<String, TimedEntry>,
}

impl MemoryCacheProvider {
    /// Create a new in-memory cache from configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self { cache }
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.cache.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        // A zero TTL entry would never be visible; leave any live entry alone.
        if ttl.is_zero() {
            return Ok(());
        }

        debug!(key, ttl_ms = ttl.as_millis() as u64, "Caching entry");
        self.cache
            .insert(
                key.to_string(),
                TimedEntry {
                    value: value.to_string(),
                    ttl,
                },
            )
            .await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.cache.invalidate(key).await;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.cache.get(key).await.is_some())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
