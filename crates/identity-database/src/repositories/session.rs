//! PostgreSQL device session repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use identity_core::result::AppResult;
use identity_entity::session::DeviceSession;

use super::store_error;
use crate::traits::SessionRepository;

const SESSION_COLUMNS: &str = "id, user_id, device_id, refresh_token_hash, refresh_count, \
     is_refresh_active, expires_at, created_at, created_by, updated_at, updated_by";

/// Device sessions stored in the `device_sessions` table.
///
/// `device_id` and `refresh_token_hash` are unique columns, so replacement
/// and rotation are single statements and need no explicit transaction.
#[derive(Debug, Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn upsert_for_device(&self, session: &DeviceSession) -> AppResult<DeviceSession> {
        sqlx::query_as::<_, DeviceSession>(&format!(
            "INSERT INTO device_sessions ({SESSION_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             ON CONFLICT (device_id) DO UPDATE SET \
                 id = EXCLUDED.id, \
                 user_id = EXCLUDED.user_id, \
                 refresh_token_hash = EXCLUDED.refresh_token_hash, \
                 refresh_count = EXCLUDED.refresh_count, \
                 is_refresh_active = EXCLUDED.is_refresh_active, \
                 expires_at = EXCLUDED.expires_at, \
                 created_at = EXCLUDED.created_at, \
                 created_by = EXCLUDED.created_by, \
                 updated_at = EXCLUDED.updated_at, \
                 updated_by = EXCLUDED.updated_by \
             RETURNING {SESSION_COLUMNS}"
        ))
        .bind(session.id)
        .bind(session.user_id)
        .bind(&session.device_id)
        .bind(&session.refresh_token_hash)
        .bind(session.refresh_count)
        .bind(session.is_refresh_active)
        .bind(session.expires_at)
        .bind(session.created_at)
        .bind(session.created_by)
        .bind(session.updated_at)
        .bind(session.updated_by)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error("Failed to open device session"))
    }

    async fn rotate_secret(
        &self,
        user_id: Uuid,
        current_hash: &str,
        new_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<DeviceSession>> {
        // The WHERE clause is re-evaluated after a concurrent writer commits,
        // so a second rotation with the same hash matches no row.
        sqlx::query_as::<_, DeviceSession>(&format!(
            "UPDATE device_sessions SET \
                 refresh_token_hash = $3, \
                 refresh_count = refresh_count + 1, \
                 updated_at = $4, \
                 updated_by = user_id \
             WHERE user_id = $1 \
               AND refresh_token_hash = $2 \
               AND is_refresh_active \
               AND expires_at > $4 \
             RETURNING {SESSION_COLUMNS}"
        ))
        .bind(user_id)
        .bind(current_hash)
        .bind(new_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error("Failed to rotate refresh token"))
    }

    async fn find_latest_by_user(&self, user_id: Uuid) -> AppResult<Option<DeviceSession>> {
        sqlx::query_as::<_, DeviceSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM device_sessions \
             WHERE user_id = $1 ORDER BY updated_at DESC LIMIT 1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error("Failed to find device session"))
    }

    async fn delete_for_device(&self, user_id: Uuid, device_id: &str) -> AppResult<u64> {
        let result =
            sqlx::query("DELETE FROM device_sessions WHERE user_id = $1 AND device_id = $2")
                .bind(user_id)
                .bind(device_id)
                .execute(&self.pool)
                .await
                .map_err(store_error("Failed to close device session"))?;

        Ok(result.rows_affected())
    }
}
