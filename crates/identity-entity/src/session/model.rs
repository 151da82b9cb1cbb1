//! Device session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Binding between a principal and a client device.
///
/// At most one session exists per `device_id`. The refresh secret itself is
/// never stored; only its SHA-256 hash is.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeviceSession {
    /// Unique session identifier.
    pub id: Uuid,
    /// The principal this session belongs to.
    pub user_id: Uuid,
    /// Client-supplied device identifier, unique across all sessions.
    pub device_id: String,
    /// SHA-256 hash of the current refresh secret.
    #[serde(skip_serializing)]
    pub refresh_token_hash: String,
    /// Number of successful rotations.
    pub refresh_count: i64,
    /// Whether the refresh secret may still be rotated.
    pub is_refresh_active: bool,
    /// When the refresh secret stops being accepted.
    pub expires_at: DateTime<Utc>,
    /// When the session was opened.
    pub created_at: DateTime<Utc>,
    /// Who opened the session.
    pub created_by: Uuid,
    /// When the session was last rotated.
    pub updated_at: DateTime<Utc>,
    /// Who last rotated the session.
    pub updated_by: Uuid,
}

impl DeviceSession {
    /// Whether the refresh secret may be rotated at `now`.
    pub fn is_rotatable(&self, now: DateTime<Utc>) -> bool {
        self.is_refresh_active && now < self.expires_at
    }
}
