//! Claims carried by every access token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use identity_entity::user::Principal;

/// Typed access token payload.
///
/// `role` is a snapshot of the principal's first role at issue time and is
/// for display only; authorization always re-reads the role graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// The principal this token was issued to.
    pub user_id: Uuid,
    /// Username at issue time.
    pub username: String,
    /// Email at issue time.
    pub email: String,
    /// First assigned role name, or empty.
    pub role: String,
    /// Always `true` for issued tokens.
    pub authorized: bool,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Unique token id, so two tokens issued in the same second differ.
    pub jti: Uuid,
}

impl AccessTokenClaims {
    /// Builds claims for a principal. `exp` is set when the token is issued.
    pub fn for_principal(principal: &Principal) -> Self {
        Self {
            user_id: principal.id,
            username: principal.username.clone(),
            email: principal.email.clone(),
            role: principal.primary_role().to_string(),
            authorized: true,
            exp: 0,
            jti: Uuid::new_v4(),
        }
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::UNIX_EPOCH)
    }

    /// Checks whether the token is past its expiry at `now`.
    ///
    /// Compared at full clock precision: a token with `exp = T` is expired
    /// from the first instant after `T`, not from `T + 1`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at()
    }
}
