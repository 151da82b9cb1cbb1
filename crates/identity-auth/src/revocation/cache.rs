//! Per-principal revoked access token cache.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use identity_cache::keys;
use identity_cache::provider::CacheManager;
use identity_core::result::AppResult;
use identity_core::traits::CacheProvider;

const EXPIRY_GRACE_SECS: i64 = 1;

/// Remembers the most recently revoked access token of each principal until
/// that token would have expired anyway.
///
/// Each principal owns exactly one cache key. Revoking again replaces the
/// previous entry and restarts its lifetime; other principals are untouched.
#[derive(Debug, Clone)]
pub struct RevocationCache {
    cache: Arc<CacheManager>,
}

impl RevocationCache {
    /// Creates a revocation cache on top of the shared cache manager.
    pub fn new(cache: Arc<CacheManager>) -> Self {
        Self { cache }
    }

    /// Revokes `token` for `principal_id` for the next `ttl`.
    pub async fn invalidate(
        &self,
        principal_id: Uuid,
        token: &str,
        ttl: Duration,
    ) -> AppResult<()> {
        let key = keys::revoked_access_token(principal_id);
        self.cache.set(&key, token, ttl).await?;
        debug!(user_id = %principal_id, ttl_ms = ttl.as_millis() as u64, "Access token revoked");
        Ok(())
    }

    /// Revokes `token` until one second past `expires_at`.
    ///
    /// The extra second covers the whole second `exp` names. A token already
    /// past that point is rejected as expired, so nothing is written and the
    /// principal's current entry stays in place.
    pub async fn invalidate_until(
        &self,
        principal_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let until = expires_at + chrono::Duration::seconds(EXPIRY_GRACE_SECS);
        match (until - Utc::now()).to_std() {
            Ok(ttl) if !ttl.is_zero() => self.invalidate(principal_id, token, ttl).await,
            _ => {
                debug!(user_id = %principal_id, "Skipping revocation of an expired token");
                Ok(())
            }
        }
    }

    /// Whether `token` is the live revoked token of `principal_id`.
    pub async fn is_revoked(&self, principal_id: Uuid, token: &str) -> AppResult<bool> {
        let key = keys::revoked_access_token(principal_id);
        Ok(self
            .cache
            .get(&key)
            .await?
            .is_some_and(|revoked| revoked.eq_ignore_ascii_case(token)))
    }
}
