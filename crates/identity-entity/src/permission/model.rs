//! Permission entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named capability that roles grant. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Permission {
    /// Permission identifier.
    pub id: i32,
    /// Unique permission name, e.g. `USERS_VIEW`.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// When the permission was created.
    pub created_at: DateTime<Utc>,
}

/// Name and description of a permission, for create and full update.
#[derive(Debug, Clone)]
pub struct PermissionFields {
    /// Unique permission name.
    pub name: String,
    /// Free-form description.
    pub description: String,
}
