//! Cache manager that dispatches to the configured provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use identity_core::config::CacheConfig;
use identity_core::result::AppResult;
use identity_core::traits::cache::CacheProvider;

use crate::keys;
use crate::memory::MemoryCacheProvider;

/// Cache manager that wraps the configured cache provider.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// The inner cache provider.
    inner: Arc<dyn CacheProvider>,
}

impl CacheManager {
    /// Create a new in-memory cache manager from configuration.
    pub fn new(config: &CacheConfig) -> Self {
        info!(
            max_capacity = config.max_capacity,
            "Initializing in-memory cache provider"
        );
        Self {
            inner: Arc::new(MemoryCacheProvider::new(config)),
        }
    }

    /// Create a cache manager from an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn CacheProvider>) -> Self {
        Self { inner: provider }
    }

    /// Write and read back a short-lived probe entry.
    pub async fn probe(&self) -> AppResult<bool> {
        let key = keys::health_probe();
        self.inner.set(&key, "ok", Duration::from_secs(5)).await?;
        let healthy = self.inner.get(&key).await?.is_some();
        Ok(healthy && self.inner.health_check().await?)
    }
}

#[async_trait]
impl CacheProvider for CacheManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.inner.exists(key).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
