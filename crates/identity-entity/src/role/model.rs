//! Role entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::permission::Permission;

/// A named bundle of permissions. Many-to-many with principals and
/// with permissions.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Role identifier. Lower ids were assigned first.
    pub id: i32,
    /// Unique role name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
    /// Permissions granted by this role, loaded separately.
    #[sqlx(skip)]
    #[serde(default)]
    pub permissions: Vec<Permission>,
}

/// Name and description of a role, for create and full update.
#[derive(Debug, Clone)]
pub struct RoleFields {
    /// Unique role name.
    pub name: String,
    /// Free-form description.
    pub description: String,
}

impl Role {
    /// Iterates over the names of the permissions this role grants.
    pub fn permission_names(&self) -> impl Iterator<Item = &str> {
        self.permissions.iter().map(|p| p.name.as_str())
    }
}
