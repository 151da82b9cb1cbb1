//! Cache provider trait for pluggable caching backends.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for key-value cache backends with per-entry expiry.
///
/// Every operation is scoped to a single key. Implementations must be safe
/// for concurrent use and must never rebuild the whole store to change one
/// entry.
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Insert or replace a value that expires after `ttl`.
    ///
    /// A zero `ttl` stores an entry that is already expired.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Delete a key from the cache.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a live entry exists for the key.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Check that the cache backend is usable.
    async fn health_check(&self) -> AppResult<bool>;
}
