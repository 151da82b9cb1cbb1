//! Device session lifecycle: open, rotate, close.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use identity_core::error::AppError;
use identity_core::result::AppResult;
use identity_database::traits::SessionRepository;
use identity_entity::session::DeviceSession;

use super::secret;

/// A session together with the plaintext refresh secret handed to the client.
///
/// The plaintext exists only here; the repository stores its hash.
#[derive(Debug, Clone)]
pub struct OpenedSession {
    /// The stored session.
    pub session: DeviceSession,
    /// The refresh secret to return to the client.
    pub refresh_secret: String,
}

/// Per-device refresh secrets with single-use rotation.
#[derive(Debug, Clone)]
pub struct SessionStore {
    repo: Arc<dyn SessionRepository>,
    refresh_ttl: Duration,
}

impl SessionStore {
    /// Creates a session store over a repository.
    pub fn new(repo: Arc<dyn SessionRepository>, refresh_ttl: Duration) -> Self {
        Self { repo, refresh_ttl }
    }

    /// Opens a fresh session for a device, replacing any existing one.
    pub async fn open(&self, principal_id: Uuid, device_id: &str) -> AppResult<OpenedSession> {
        if device_id.trim().is_empty() {
            return Err(AppError::validation("Device id must not be empty"));
        }

        let refresh_secret = secret::generate();
        let now = Utc::now();
        let lifetime = chrono::Duration::from_std(self.refresh_ttl)
            .map_err(|e| AppError::internal(format!("Refresh lifetime out of range: {e}")))?;

        let session = DeviceSession {
            id: Uuid::now_v7(),
            user_id: principal_id,
            device_id: device_id.to_string(),
            refresh_token_hash: secret::hash(&refresh_secret),
            refresh_count: 0,
            is_refresh_active: true,
            expires_at: now + lifetime,
            created_at: now,
            created_by: principal_id,
            updated_at: now,
            updated_by: principal_id,
        };

        let session = self.repo.upsert_for_device(&session).await?;
        info!(user_id = %principal_id, device_id = %device_id, "Device session opened");

        Ok(OpenedSession {
            session,
            refresh_secret,
        })
    }

    /// Exchanges a refresh secret for a new one.
    ///
    /// The session is found by the presented secret. Unknown, superseded,
    /// expired or foreign secrets fail with `RefreshTokenInvalid`; of two
    /// concurrent calls with the same secret at most one succeeds.
    pub async fn rotate(
        &self,
        principal_id: Uuid,
        presented_secret: &str,
    ) -> AppResult<OpenedSession> {
        let next_secret = secret::generate();
        let rotated = self
            .repo
            .rotate_secret(
                principal_id,
                &secret::hash(presented_secret),
                &secret::hash(&next_secret),
                Utc::now(),
            )
            .await?;

        match rotated {
            Some(session) => {
                info!(
                    user_id = %principal_id,
                    device_id = %session.device_id,
                    refresh_count = session.refresh_count,
                    "Refresh secret rotated"
                );
                Ok(OpenedSession {
                    session,
                    refresh_secret: next_secret,
                })
            }
            None => {
                warn!(user_id = %principal_id, "Refresh secret rejected");
                Err(AppError::refresh_token_invalid("Invalid refresh token"))
            }
        }
    }

    /// Closes the principal's session on a device. Returns sessions closed.
    pub async fn close(&self, principal_id: Uuid, device_id: &str) -> AppResult<u64> {
        let closed = self.repo.delete_for_device(principal_id, device_id).await?;
        if closed > 0 {
            info!(user_id = %principal_id, device_id = %device_id, "Device session closed");
        }
        Ok(closed)
    }

    /// The principal's most recently updated session.
    pub async fn find_by_principal(&self, principal_id: Uuid) -> AppResult<DeviceSession> {
        self.repo
            .find_latest_by_user(principal_id)
            .await?
            .ok_or_else(|| AppError::not_found("No session for principal"))
    }
}
