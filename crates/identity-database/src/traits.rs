//! Store traits the auth core depends on.
//!
//! The core never talks to a database directly; it holds
//! `Arc<dyn CredentialStore>` and `Arc<dyn SessionRepository>` handles
//! injected at startup.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use identity_core::result::AppResult;
use identity_entity::permission::{Permission, PermissionFields};
use identity_entity::role::{Role, RoleFields};
use identity_entity::session::DeviceSession;
use identity_entity::user::{CreatePrincipal, Principal, UpdatePrincipal};

/// Persistence of principals and their role graph.
///
/// Every principal returned carries its roles (ordered by role id), and
/// every role carries its permissions (ordered by permission id). Backend
/// failures surface as `StoreUnavailable`; duplicate unique names as
/// `Conflict`; references to missing rows as `NotFound`.
#[async_trait]
pub trait CredentialStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a principal by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Principal>>;

    /// Find a principal by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Principal>>;

    /// List all principals ordered by username.
    async fn list_principals(&self) -> AppResult<Vec<Principal>>;

    /// Create a principal holding `data.role_ids`, all or nothing.
    ///
    /// Duplicate username or email (ignoring case) is a `Conflict`; an
    /// unknown role is `NotFound` and leaves no principal behind.
    async fn create_principal(&self, data: CreatePrincipal) -> AppResult<Principal>;

    /// Replace a principal's profile fields. Returns `None` if it does not
    /// exist.
    async fn update_principal(
        &self,
        id: Uuid,
        data: UpdatePrincipal,
        updated_by: Uuid,
    ) -> AppResult<Option<Principal>>;

    /// Replace a principal's password hash. Returns whether it exists.
    async fn set_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
        updated_by: Uuid,
    ) -> AppResult<bool>;

    /// Enable or disable a principal. Returns `None` if it does not exist.
    async fn set_enabled(
        &self,
        id: Uuid,
        enabled: bool,
        updated_by: Uuid,
    ) -> AppResult<Option<Principal>>;

    /// Delete a principal with its role assignments and device sessions.
    /// Returns whether it existed.
    async fn delete_principal(&self, id: Uuid) -> AppResult<bool>;

    /// Assign a role to a principal. Assigning an already held role is a
    /// no-op. Unknown principal or role is `NotFound`.
    async fn assign_role(&self, principal_id: Uuid, role_id: i32) -> AppResult<Principal>;

    /// Take a role away from a principal. Returns whether it was held.
    async fn remove_role(&self, principal_id: Uuid, role_id: i32) -> AppResult<bool>;

    /// Find a role by id.
    async fn find_role_by_id(&self, id: i32) -> AppResult<Option<Role>>;

    /// Find a role by its unique name.
    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    /// List all roles with their permissions, ordered by id.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Create a role without permissions.
    async fn create_role(&self, data: RoleFields) -> AppResult<Role>;

    /// Replace a role's name and description. Returns `None` if it does not
    /// exist.
    async fn update_role(&self, id: i32, data: RoleFields) -> AppResult<Option<Role>>;

    /// Delete a role; principals holding it lose it. Returns whether it
    /// existed.
    async fn delete_role(&self, id: i32) -> AppResult<bool>;

    /// Grant permissions to a role, all or nothing. Already granted ones are
    /// kept. Unknown role or permission is `NotFound`.
    async fn add_permissions_to_role(
        &self,
        role_id: i32,
        permission_ids: &[i32],
    ) -> AppResult<Role>;

    /// Withdraw a permission from a role. Returns whether it was granted.
    async fn remove_permission_from_role(
        &self,
        role_id: i32,
        permission_id: i32,
    ) -> AppResult<bool>;

    /// Find a permission by id.
    async fn find_permission_by_id(&self, id: i32) -> AppResult<Option<Permission>>;

    /// List all permissions ordered by id.
    async fn list_permissions(&self) -> AppResult<Vec<Permission>>;

    /// Create a permission.
    async fn create_permission(&self, data: PermissionFields) -> AppResult<Permission>;

    /// Replace a permission's name and description. Returns `None` if it
    /// does not exist.
    async fn update_permission(
        &self,
        id: i32,
        data: PermissionFields,
    ) -> AppResult<Option<Permission>>;

    /// Delete a permission; roles granting it lose it. Returns whether it
    /// existed.
    async fn delete_permission(&self, id: i32) -> AppResult<bool>;
}

/// Persistence of device sessions.
///
/// Implementations must make each method atomic on its own; the session
/// store builds its guarantees on top of these primitives.
#[async_trait]
pub trait SessionRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a session, replacing any existing session for the same
    /// device id (whoever owned it).
    async fn upsert_for_device(&self, session: &DeviceSession) -> AppResult<DeviceSession>;

    /// Compare-and-swap the refresh hash.
    ///
    /// Succeeds only if a session of `user_id` currently holds
    /// `current_hash`, is active and unexpired at `now`. On success the
    /// hash becomes `new_hash`, the counter increments and `updated_at`
    /// becomes `now`. Of two racing calls with the same `current_hash`, at
    /// most one returns `Some`.
    async fn rotate_secret(
        &self,
        user_id: Uuid,
        current_hash: &str,
        new_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<DeviceSession>>;

    /// The most recently updated session of a principal.
    async fn find_latest_by_user(&self, user_id: Uuid) -> AppResult<Option<DeviceSession>>;

    /// Delete the principal's session for a device. Returns rows removed.
    async fn delete_for_device(&self, user_id: Uuid, device_id: &str) -> AppResult<u64>;
}
