//! Principal management: signup, administration, passwords and role holding.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use identity_core::error::AppError;
use identity_core::result::AppResult;
use identity_database::traits::CredentialStore;
use identity_entity::permission::names::DEFAULT_SIGNUP_ROLE;
use identity_entity::user::{AuthProvider, CreatePrincipal, Principal, UpdatePrincipal};

use crate::password::{PasswordHasher, PasswordValidator};

/// Registration data for a local principal.
#[derive(Debug, Clone)]
pub struct Signup {
    /// Desired login name.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Plaintext password, validated then hashed.
    pub password: String,
}

/// Principal management on top of the credential store.
#[derive(Debug, Clone)]
pub struct AccountService {
    credentials: Arc<dyn CredentialStore>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
}

impl AccountService {
    /// Creates the account service.
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
    ) -> Self {
        Self {
            credentials,
            hasher,
            validator,
        }
    }

    /// Registers a local principal holding the default signup role when that
    /// role exists. The role is granted in the same store write as the insert.
    pub async fn signup(&self, data: Signup) -> AppResult<Principal> {
        let role_ids = match self.credentials.find_role_by_name(DEFAULT_SIGNUP_ROLE).await? {
            Some(role) => vec![role.id],
            None => vec![],
        };

        let principal = self.register(data, None, role_ids).await?;
        info!(user_id = %principal.id, username = %principal.username, "Principal registered");
        Ok(principal)
    }

    /// Creates a local principal on behalf of an administrator.
    pub async fn create_principal(
        &self,
        actor: Uuid,
        data: Signup,
        role_ids: Vec<i32>,
    ) -> AppResult<Principal> {
        let principal = self.register(data, Some(actor), role_ids).await?;
        info!(user_id = %principal.id, actor = %actor, "Principal created");
        Ok(principal)
    }

    async fn register(
        &self,
        data: Signup,
        created_by: Option<Uuid>,
        role_ids: Vec<i32>,
    ) -> AppResult<Principal> {
        self.validator
            .validate(&data.password, &[data.username.as_str(), data.email.as_str()])?;
        let password_hash = self.hasher.hash_password(&data.password)?;

        self.credentials
            .create_principal(CreatePrincipal {
                username: data.username,
                first_name: data.first_name,
                last_name: data.last_name,
                email: data.email,
                password_hash,
                provider: AuthProvider::Local.as_str().to_string(),
                created_by,
                role_ids,
            })
            .await
    }

    /// All principals ordered by username.
    pub async fn list_principals(&self) -> AppResult<Vec<Principal>> {
        self.credentials.list_principals().await
    }

    /// A principal by id, or `NotFound`.
    pub async fn get_principal(&self, id: Uuid) -> AppResult<Principal> {
        self.credentials
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Replaces a principal's profile fields.
    pub async fn update_principal(
        &self,
        actor: Uuid,
        id: Uuid,
        data: UpdatePrincipal,
    ) -> AppResult<Principal> {
        let principal = self
            .credentials
            .update_principal(id, data, actor)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        info!(user_id = %id, actor = %actor, "Principal updated");
        Ok(principal)
    }

    /// Deletes a principal together with its role assignments.
    pub async fn delete_principal(&self, actor: Uuid, id: Uuid) -> AppResult<()> {
        if !self.credentials.delete_principal(id).await? {
            return Err(AppError::not_found("User not found"));
        }
        info!(user_id = %id, actor = %actor, "Principal deleted");
        Ok(())
    }

    /// Replaces a principal's password after the signup password policy.
    pub async fn set_password(&self, actor: Uuid, id: Uuid, password: &str) -> AppResult<()> {
        let target = self.get_principal(id).await?;
        self.validator
            .validate(password, &[target.username.as_str(), target.email.as_str()])?;
        let password_hash = self.hasher.hash_password(password)?;

        if !self
            .credentials
            .set_password_hash(id, &password_hash, actor)
            .await?
        {
            return Err(AppError::not_found("User not found"));
        }
        info!(user_id = %id, actor = %actor, "Password changed");
        Ok(())
    }

    /// Enables or disables a principal.
    pub async fn set_enabled(&self, actor: Uuid, id: Uuid, enabled: bool) -> AppResult<Principal> {
        let principal = self
            .credentials
            .set_enabled(id, enabled, actor)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        info!(user_id = %id, actor = %actor, enabled, "Principal enabled flag changed");
        Ok(principal)
    }

    /// Grants a role to a principal.
    pub async fn assign_role(&self, actor: Uuid, id: Uuid, role_id: i32) -> AppResult<Principal> {
        let principal = self.credentials.assign_role(id, role_id).await?;
        info!(user_id = %id, actor = %actor, role_id, "Role assigned");
        Ok(principal)
    }

    /// Withdraws a role from a principal; `NotFound` unless it was held.
    pub async fn remove_role(&self, actor: Uuid, id: Uuid, role_id: i32) -> AppResult<()> {
        if !self.credentials.remove_role(id, role_id).await? {
            return Err(AppError::not_found("User does not hold that role"));
        }
        info!(user_id = %id, actor = %actor, role_id, "Role removed");
        Ok(())
    }
}
