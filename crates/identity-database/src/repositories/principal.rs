//! PostgreSQL credential store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use identity_core::error::AppError;
use identity_core::result::AppResult;
use identity_entity::permission::{Permission, PermissionFields};
use identity_entity::role::{Role, RoleFields};
use identity_entity::user::{CreatePrincipal, Principal, UpdatePrincipal};

use super::store_error;
use crate::traits::CredentialStore;

/// A role row joined with the principal that holds it.
#[derive(FromRow)]
struct HeldRole {
    user_id: Uuid,
    #[sqlx(flatten)]
    role: Role,
}

/// A permission row joined with the role that grants it.
#[derive(FromRow)]
struct GrantedPermission {
    role_id: i32,
    #[sqlx(flatten)]
    permission: Permission,
}

const PRINCIPAL_COLUMNS: &str = "id, username, first_name, last_name, email, password_hash, \
     enabled, provider, created_at, created_by, updated_at, updated_by";

const ROLE_COLUMNS: &str = "id, name, description, created_at";

const PERMISSION_COLUMNS: &str = "id, name, description, created_at";

/// Credential store over the `users`, `roles`, `permissions`,
/// `user_roles` and `role_permissions` tables.
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    /// Create a new credential store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach permissions to each role.
    async fn load_permissions(&self, roles: &mut [Role]) -> AppResult<()> {
        if roles.is_empty() {
            return Ok(());
        }
        let role_ids: Vec<i32> = roles.iter().map(|r| r.id).collect();

        let rows = sqlx::query_as::<_, GrantedPermission>(
            "SELECT rp.role_id, p.id, p.name, p.description, p.created_at \
             FROM role_permissions rp \
             JOIN permissions p ON p.id = rp.permission_id \
             WHERE rp.role_id = ANY($1) \
             ORDER BY p.id",
        )
        .bind(&role_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error("Failed to load role permissions"))?;

        let mut by_role: HashMap<i32, Vec<Permission>> = HashMap::new();
        for row in rows {
            by_role.entry(row.role_id).or_default().push(row.permission);
        }
        for role in roles.iter_mut() {
            role.permissions = by_role.remove(&role.id).unwrap_or_default();
        }
        Ok(())
    }

    /// Attach roles (with permissions) to each principal.
    async fn load_roles(&self, principals: &mut [Principal]) -> AppResult<()> {
        if principals.is_empty() {
            return Ok(());
        }
        let user_ids: Vec<Uuid> = principals.iter().map(|p| p.id).collect();

        let rows = sqlx::query_as::<_, HeldRole>(
            "SELECT ur.user_id, r.id, r.name, r.description, r.created_at \
             FROM user_roles ur \
             JOIN roles r ON r.id = ur.role_id \
             WHERE ur.user_id = ANY($1) \
             ORDER BY r.id",
        )
        .bind(&user_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error("Failed to load principal roles"))?;

        let mut roles: Vec<Role> = Vec::new();
        let mut holders: Vec<Uuid> = Vec::new();
        for row in rows {
            holders.push(row.user_id);
            roles.push(row.role);
        }
        self.load_permissions(&mut roles).await?;

        let mut by_user: HashMap<Uuid, Vec<Role>> = HashMap::new();
        for (user_id, role) in holders.into_iter().zip(roles) {
            by_user.entry(user_id).or_default().push(role);
        }
        for principal in principals.iter_mut() {
            principal.roles = by_user.remove(&principal.id).unwrap_or_default();
        }
        Ok(())
    }

    async fn hydrate_role(&self, role: Option<Role>) -> AppResult<Option<Role>> {
        match role {
            Some(role) => {
                let mut one = [role];
                self.load_permissions(&mut one).await?;
                let [role] = one;
                Ok(Some(role))
            }
            None => Ok(None),
        }
    }

    async fn hydrate(&self, principal: Option<Principal>) -> AppResult<Option<Principal>> {
        match principal {
            Some(p) => {
                let mut one = [p];
                self.load_roles(&mut one).await?;
                let [p] = one;
                Ok(Some(p))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Principal>> {
        let principal = sqlx::query_as::<_, Principal>(&format!(
            "SELECT {PRINCIPAL_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error("Failed to find principal by email"))?;

        self.hydrate(principal).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Principal>> {
        let principal = sqlx::query_as::<_, Principal>(&format!(
            "SELECT {PRINCIPAL_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error("Failed to find principal"))?;

        self.hydrate(principal).await
    }

    async fn list_principals(&self) -> AppResult<Vec<Principal>> {
        let mut principals = sqlx::query_as::<_, Principal>(&format!(
            "SELECT {PRINCIPAL_COLUMNS} FROM users ORDER BY username"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(store_error("Failed to list principals"))?;

        self.load_roles(&mut principals).await?;
        Ok(principals)
    }

    async fn create_principal(&self, data: CreatePrincipal) -> AppResult<Principal> {
        let id = Uuid::now_v7();
        let actor = data.created_by.unwrap_or(id);
        let now = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(store_error("Failed to begin principal transaction"))?;

        let principal = sqlx::query_as::<_, Principal>(&format!(
            "INSERT INTO users (id, username, first_name, last_name, email, password_hash, \
             enabled, provider, created_at, created_by, updated_at, updated_by) \
             VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7, $8, $9, $8, $9) \
             RETURNING {PRINCIPAL_COLUMNS}"
        ))
        .bind(id)
        .bind(&data.username)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.provider)
        .bind(now)
        .bind(actor)
        .fetch_one(&mut *tx)
        .await
        .map_err(store_error("Failed to create principal"))?;

        if !data.role_ids.is_empty() {
            sqlx::query(
                "INSERT INTO user_roles (user_id, role_id) \
                 SELECT $1, UNNEST($2::INTEGER[]) ON CONFLICT DO NOTHING",
            )
            .bind(id)
            .bind(&data.role_ids)
            .execute(&mut *tx)
            .await
            .map_err(store_error("Failed to assign initial roles"))?;
        }

        tx.commit()
            .await
            .map_err(store_error("Failed to commit principal"))?;

        self.hydrate(Some(principal))
            .await?
            .ok_or_else(|| AppError::internal("Created principal vanished"))
    }

    async fn update_principal(
        &self,
        id: Uuid,
        data: UpdatePrincipal,
        updated_by: Uuid,
    ) -> AppResult<Option<Principal>> {
        let principal = sqlx::query_as::<_, Principal>(&format!(
            "UPDATE users SET username = $2, first_name = $3, last_name = $4, email = $5, \
             updated_at = NOW(), updated_by = $6 \
             WHERE id = $1 RETURNING {PRINCIPAL_COLUMNS}"
        ))
        .bind(id)
        .bind(&data.username)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(updated_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error("Failed to update principal"))?;

        self.hydrate(principal).await
    }

    async fn set_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
        updated_by: Uuid,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW(), updated_by = $3 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .bind(updated_by)
        .execute(&self.pool)
        .await
        .map_err(store_error("Failed to set password"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_enabled(
        &self,
        id: Uuid,
        enabled: bool,
        updated_by: Uuid,
    ) -> AppResult<Option<Principal>> {
        let principal = sqlx::query_as::<_, Principal>(&format!(
            "UPDATE users SET enabled = $2, updated_at = NOW(), updated_by = $3 \
             WHERE id = $1 RETURNING {PRINCIPAL_COLUMNS}"
        ))
        .bind(id)
        .bind(enabled)
        .bind(updated_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error("Failed to update principal"))?;

        self.hydrate(principal).await
    }

    async fn delete_principal(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_error("Failed to delete principal"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn assign_role(&self, principal_id: Uuid, role_id: i32) -> AppResult<Principal> {
        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(principal_id)
        .bind(role_id)
        .execute(&self.pool)
        .await
        .map_err(store_error("Failed to assign role"))?;

        self.find_by_id(principal_id)
            .await?
            .ok_or_else(|| AppError::not_found("Principal not found"))
    }

    async fn remove_role(&self, principal_id: Uuid, role_id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role_id = $2")
            .bind(principal_id)
            .bind(role_id)
            .execute(&self.pool)
            .await
            .map_err(store_error("Failed to remove role"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_role_by_id(&self, id: i32) -> AppResult<Option<Role>> {
        let role = sqlx::query_as::<_, Role>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error("Failed to find role"))?;

        self.hydrate_role(role).await
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let role = sqlx::query_as::<_, Role>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error("Failed to find role"))?;

        self.hydrate_role(role).await
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let mut roles = sqlx::query_as::<_, Role>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(store_error("Failed to list roles"))?;

        self.load_permissions(&mut roles).await?;
        Ok(roles)
    }

    async fn create_role(&self, data: RoleFields) -> AppResult<Role> {
        sqlx::query_as::<_, Role>(&format!(
            "INSERT INTO roles (name, description) VALUES ($1, $2) RETURNING {ROLE_COLUMNS}"
        ))
        .bind(&data.name)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error("Failed to create role"))
    }

    async fn update_role(&self, id: i32, data: RoleFields) -> AppResult<Option<Role>> {
        let role = sqlx::query_as::<_, Role>(&format!(
            "UPDATE roles SET name = $2, description = $3 WHERE id = $1 \
             RETURNING {ROLE_COLUMNS}"
        ))
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error("Failed to update role"))?;

        self.hydrate_role(role).await
    }

    async fn delete_role(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_error("Failed to delete role"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_permissions_to_role(
        &self,
        role_id: i32,
        permission_ids: &[i32],
    ) -> AppResult<Role> {
        if self.find_role_by_id(role_id).await?.is_none() {
            return Err(AppError::not_found("Role not found"));
        }

        // One statement: any unknown permission fails the whole batch.
        sqlx::query(
            "INSERT INTO role_permissions (role_id, permission_id) \
             SELECT $1, UNNEST($2::INTEGER[]) ON CONFLICT DO NOTHING",
        )
        .bind(role_id)
        .bind(permission_ids)
        .execute(&self.pool)
        .await
        .map_err(store_error("Failed to grant permissions"))?;

        self.find_role_by_id(role_id)
            .await?
            .ok_or_else(|| AppError::not_found("Role not found"))
    }

    async fn remove_permission_from_role(
        &self,
        role_id: i32,
        permission_id: i32,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM role_permissions WHERE role_id = $1 AND permission_id = $2",
        )
        .bind(role_id)
        .bind(permission_id)
        .execute(&self.pool)
        .await
        .map_err(store_error("Failed to withdraw permission"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_permission_by_id(&self, id: i32) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, Permission>(&format!(
            "SELECT {PERMISSION_COLUMNS} FROM permissions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error("Failed to find permission"))
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        sqlx::query_as::<_, Permission>(&format!(
            "SELECT {PERMISSION_COLUMNS} FROM permissions ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(store_error("Failed to list permissions"))
    }

    async fn create_permission(&self, data: PermissionFields) -> AppResult<Permission> {
        sqlx::query_as::<_, Permission>(&format!(
            "INSERT INTO permissions (name, description) VALUES ($1, $2) \
             RETURNING {PERMISSION_COLUMNS}"
        ))
        .bind(&data.name)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error("Failed to create permission"))
    }

    async fn update_permission(
        &self,
        id: i32,
        data: PermissionFields,
    ) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, Permission>(&format!(
            "UPDATE permissions SET name = $2, description = $3 WHERE id = $1 \
             RETURNING {PERMISSION_COLUMNS}"
        ))
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error("Failed to update permission"))
    }

    async fn delete_permission(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM permissions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_error("Failed to delete permission"))?;

        Ok(result.rows_affected() > 0)
    }
}
