//! Principal entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::role::Role;

/// An identity that can authenticate.
///
/// Owned by the credential store; the auth core reads it and never mutates
/// fields except through explicit store operations.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Principal {
    /// Unique principal identifier.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Given name.
    #[serde(rename = "firstname")]
    pub first_name: String,
    /// Family name.
    #[serde(rename = "lastname")]
    pub last_name: String,
    /// Unique email address, used as the login identifier.
    pub email: String,
    /// Argon2 password hash. Empty for externally authenticated principals.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Disabled principals cannot log in, refresh, or log out.
    pub enabled: bool,
    /// `"local"` or the name of the external identity provider.
    pub provider: String,
    /// When the principal was created.
    pub created_at: DateTime<Utc>,
    /// Who created the principal.
    pub created_by: Uuid,
    /// When the principal was last updated.
    pub updated_at: DateTime<Utc>,
    /// Who last updated the principal.
    pub updated_by: Uuid,
    /// Assigned roles ordered by role id, loaded separately.
    #[sqlx(skip)]
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl Principal {
    /// Name of the first assigned role, or an empty string.
    ///
    /// Embedded in access tokens for display only.
    pub fn primary_role(&self) -> &str {
        self.roles.first().map(|r| r.name.as_str()).unwrap_or("")
    }

    /// Whether the principal is disabled.
    pub fn is_locked(&self) -> bool {
        !self.enabled
    }
}

/// Data required to create a new principal.
#[derive(Debug, Clone)]
pub struct CreatePrincipal {
    /// Desired login name.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Identity provider name.
    pub provider: String,
    /// Creating principal, or `None` for self-registration.
    pub created_by: Option<Uuid>,
    /// Roles granted together with the insert.
    pub role_ids: Vec<i32>,
}

/// Profile fields replaced by an administrative update.
#[derive(Debug, Clone)]
pub struct UpdatePrincipal {
    /// Login name.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address.
    pub email: String,
}
