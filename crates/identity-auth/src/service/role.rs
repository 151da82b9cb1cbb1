//! Role graph management: roles, permissions and the grants between them.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use identity_core::error::AppError;
use identity_core::result::AppResult;
use identity_database::traits::CredentialStore;
use identity_entity::permission::{Permission, PermissionFields};
use identity_entity::role::{Role, RoleFields};

/// Maintains roles, permissions and role permission grants.
///
/// Authorization reads the graph from the store on every request, so each
/// change here applies to the next request of every affected principal.
#[derive(Debug, Clone)]
pub struct RoleService {
    credentials: Arc<dyn CredentialStore>,
}

impl RoleService {
    /// Creates the role service.
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self { credentials }
    }

    /// All roles with their permissions.
    pub async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.credentials.list_roles().await
    }

    /// A role by id, or `NotFound`.
    pub async fn get_role(&self, id: i32) -> AppResult<Role> {
        self.credentials
            .find_role_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Role not found"))
    }

    pub async fn create_role(&self, actor: Uuid, data: RoleFields) -> AppResult<Role> {
        let role = self.credentials.create_role(data).await?;
        info!(role_id = role.id, name = %role.name, actor = %actor, "Role created");
        Ok(role)
    }

    pub async fn update_role(&self, actor: Uuid, id: i32, data: RoleFields) -> AppResult<Role> {
        let role = self
            .credentials
            .update_role(id, data)
            .await?
            .ok_or_else(|| AppError::not_found("Role not found"))?;
        info!(role_id = id, actor = %actor, "Role updated");
        Ok(role)
    }

    /// Deletes a role; holders lose it immediately.
    pub async fn delete_role(&self, actor: Uuid, id: i32) -> AppResult<()> {
        if !self.credentials.delete_role(id).await? {
            return Err(AppError::not_found("Role not found"));
        }
        info!(role_id = id, actor = %actor, "Role deleted");
        Ok(())
    }

    /// Grants every listed permission to a role, or none of them.
    pub async fn grant_permissions(
        &self,
        actor: Uuid,
        role_id: i32,
        permission_ids: &[i32],
    ) -> AppResult<Role> {
        if permission_ids.is_empty() {
            return Err(AppError::validation("At least one permission is required"));
        }
        let role = self
            .credentials
            .add_permissions_to_role(role_id, permission_ids)
            .await?;
        info!(role_id, actor = %actor, granted = ?permission_ids, "Permissions granted");
        Ok(role)
    }

    /// Withdraws one permission from a role; `NotFound` unless it was granted.
    pub async fn withdraw_permission(
        &self,
        actor: Uuid,
        role_id: i32,
        permission_id: i32,
    ) -> AppResult<()> {
        if !self
            .credentials
            .remove_permission_from_role(role_id, permission_id)
            .await?
        {
            return Err(AppError::not_found("Role does not grant that permission"));
        }
        info!(role_id, permission_id, actor = %actor, "Permission withdrawn");
        Ok(())
    }

    /// All permissions.
    pub async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        self.credentials.list_permissions().await
    }

    /// A permission by id, or `NotFound`.
    pub async fn get_permission(&self, id: i32) -> AppResult<Permission> {
        self.credentials
            .find_permission_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Permission not found"))
    }

    pub async fn create_permission(
        &self,
        actor: Uuid,
        data: PermissionFields,
    ) -> AppResult<Permission> {
        let permission = self.credentials.create_permission(data).await?;
        info!(
            permission_id = permission.id,
            name = %permission.name,
            actor = %actor,
            "Permission created"
        );
        Ok(permission)
    }

    /// Renames or redescribes a permission. Checks keyed on the old name stop
    /// matching at once.
    pub async fn update_permission(
        &self,
        actor: Uuid,
        id: i32,
        data: PermissionFields,
    ) -> AppResult<Permission> {
        let permission = self
            .credentials
            .update_permission(id, data)
            .await?
            .ok_or_else(|| AppError::not_found("Permission not found"))?;
        info!(permission_id = id, actor = %actor, "Permission updated");
        Ok(permission)
    }

    pub async fn delete_permission(&self, actor: Uuid, id: i32) -> AppResult<()> {
        if !self.credentials.delete_permission(id).await? {
            return Err(AppError::not_found("Permission not found"));
        }
        info!(permission_id = id, actor = %actor, "Permission deleted");
        Ok(())
    }
}
