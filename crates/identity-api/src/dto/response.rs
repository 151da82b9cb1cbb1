//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use identity_entity::permission::Permission;
use identity_entity::role::Role;
use identity_entity::user::Principal;

/// Plain message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message text.
    pub message: String,
}

/// User as returned by the API. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Given name.
    pub firstname: String,
    /// Family name.
    pub lastname: String,
    /// Email.
    pub email: String,
    /// Whether the user may log in.
    pub enabled: bool,
    /// Identity provider.
    pub provider: String,
    /// Assigned role names, in assignment order.
    pub roles: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<Principal> for UserResponse {
    fn from(p: Principal) -> Self {
        Self {
            roles: p.roles.into_iter().map(|r| r.name).collect(),
            id: p.id,
            username: p.username,
            firstname: p.first_name,
            lastname: p.last_name,
            email: p.email,
            enabled: p.enabled,
            provider: p.provider,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Permission entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionResponse {
    /// Permission ID.
    pub id: i32,
    /// Permission name.
    pub name: String,
    /// Description.
    pub description: String,
}

impl From<Permission> for PermissionResponse {
    fn from(p: Permission) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
        }
    }
}

/// Role with the names of the permissions it grants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleResponse {
    /// Role ID.
    pub id: i32,
    /// Role name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Granted permission names.
    pub permissions: Vec<String>,
}

impl From<Role> for RoleResponse {
    fn from(r: Role) -> Self {
        Self {
            permissions: r.permission_names().map(str::to_string).collect(),
            id: r.id,
            name: r.name,
            description: r.description,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Revocation cache status.
    pub cache: String,
}
