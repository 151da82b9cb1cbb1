//! In-memory credential store.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use identity_core::error::AppError;
use identity_core::result::AppResult;
use identity_entity::permission::{Permission, PermissionFields};
use identity_entity::role::{Role, RoleFields};
use identity_entity::user::{CreatePrincipal, Principal, UpdatePrincipal};

use crate::seed::default_roles;
use crate::traits::CredentialStore;

/// Principals, roles and permissions held in concurrent maps.
///
/// Unique names (email, username, role and permission names) are claimed
/// through dedicated index maps, so two concurrent writers of the same name
/// cannot both succeed. Role and permission links are kept as id sets and
/// resolved on read, so renames and deletes are visible everywhere at once.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    principals: DashMap<Uuid, Principal>,
    emails: DashMap<String, Uuid>,
    usernames: DashMap<String, Uuid>,
    roles: DashMap<i32, Role>,
    role_names: DashMap<String, i32>,
    permissions: DashMap<i32, Permission>,
    permission_names: DashMap<String, i32>,
    assignments: DashMap<Uuid, BTreeSet<i32>>,
    grants: DashMap<i32, BTreeSet<i32>>,
    next_role_id: AtomicI32,
    next_permission_id: AtomicI32,
}

/// Claim `key` for `owner`. True if now (or already) owned by `owner`.
fn claim<V: Copy + PartialEq>(index: &DashMap<String, V>, key: &str, owner: V) -> bool {
    match index.entry(key.to_string()) {
        Entry::Occupied(slot) => *slot.get() == owner,
        Entry::Vacant(slot) => {
            slot.insert(owner);
            true
        }
    }
}

/// Release `key` if `owner` holds it.
fn release<V: PartialEq>(index: &DashMap<String, V>, key: &str, owner: V) {
    index.remove_if(key, |_, held| *held == owner);
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding every known permission and the default roles.
    pub fn with_default_roles() -> Self {
        let store = Self::new();
        for grant in default_roles() {
            store.add_role(grant.name, grant.description, &grant.permissions);
        }
        store
    }

    /// Create a permission, or return the existing one with that name.
    pub fn add_permission(&self, name: &str) -> Permission {
        let existing = self
            .permission_names
            .get(name)
            .and_then(|id| self.permissions.get(id.value()).map(|p| p.value().clone()));
        if let Some(found) = existing {
            return found;
        }

        let permission = Permission {
            id: self.next_permission_id.fetch_add(1, Ordering::SeqCst) + 1,
            name: name.to_string(),
            description: String::new(),
            created_at: Utc::now(),
        };
        self.permissions.insert(permission.id, permission.clone());
        self.permission_names
            .insert(permission.name.clone(), permission.id);
        permission
    }

    /// Create a role granting the named permissions, or return the existing
    /// role with that name unchanged.
    pub fn add_role(&self, name: &str, description: &str, permissions: &[&str]) -> Role {
        let existing = self.role_names.get(name).map(|id| *id.value());
        if let Some(found) = existing.and_then(|id| self.roles.get(&id).map(|r| r.value().clone()))
        {
            return self.with_permissions(found);
        }

        let granted: BTreeSet<i32> = permissions
            .iter()
            .map(|p| self.add_permission(p).id)
            .collect();
        let role = Role {
            id: self.next_role_id.fetch_add(1, Ordering::SeqCst) + 1,
            name: name.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
            permissions: vec![],
        };
        self.roles.insert(role.id, role.clone());
        self.role_names.insert(role.name.clone(), role.id);
        self.grants.insert(role.id, granted);
        self.with_permissions(role)
    }

    fn with_permissions(&self, mut role: Role) -> Role {
        let granted: Vec<i32> = self
            .grants
            .get(&role.id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default();
        role.permissions = granted
            .into_iter()
            .filter_map(|id| self.permissions.get(&id).map(|p| p.value().clone()))
            .collect();
        role
    }

    fn hydrate(&self, mut principal: Principal) -> Principal {
        let held: Vec<i32> = self
            .assignments
            .get(&principal.id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default();
        principal.roles = held
            .into_iter()
            .filter_map(|id| self.roles.get(&id).map(|r| r.value().clone()))
            .map(|role| self.with_permissions(role))
            .collect();
        principal
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Principal>> {
        let id = match self.emails.get(&email.to_lowercase()) {
            Some(id) => *id.value(),
            None => return Ok(None),
        };
        self.find_by_id(id).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Principal>> {
        let principal = self.principals.get(&id).map(|p| p.value().clone());
        Ok(principal.map(|p| self.hydrate(p)))
    }

    async fn list_principals(&self) -> AppResult<Vec<Principal>> {
        let mut all: Vec<Principal> = self
            .principals
            .iter()
            .map(|p| p.value().clone())
            .collect();
        all.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(all.into_iter().map(|p| self.hydrate(p)).collect())
    }

    async fn create_principal(&self, data: CreatePrincipal) -> AppResult<Principal> {
        if data.role_ids.iter().any(|id| !self.roles.contains_key(id)) {
            return Err(AppError::not_found("Role not found"));
        }

        let id = Uuid::now_v7();
        let email_key = data.email.to_lowercase();
        if !claim(&self.emails, &email_key, id) {
            return Err(AppError::conflict("Email is already registered"));
        }
        if !claim(&self.usernames, &data.username, id) {
            release(&self.emails, &email_key, id);
            return Err(AppError::conflict("Username is already taken"));
        }

        let now = Utc::now();
        let actor = data.created_by.unwrap_or(id);
        let principal = Principal {
            id,
            username: data.username,
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            password_hash: data.password_hash,
            enabled: true,
            provider: data.provider,
            created_at: now,
            created_by: actor,
            updated_at: now,
            updated_by: actor,
            roles: vec![],
        };

        if !data.role_ids.is_empty() {
            self.assignments
                .insert(id, data.role_ids.into_iter().collect());
        }
        self.principals.insert(id, principal.clone());
        Ok(self.hydrate(principal))
    }

    async fn update_principal(
        &self,
        id: Uuid,
        data: UpdatePrincipal,
        updated_by: Uuid,
    ) -> AppResult<Option<Principal>> {
        let (old_email, old_username) = match self.principals.get(&id) {
            Some(p) => (p.email.to_lowercase(), p.username.clone()),
            None => return Ok(None),
        };

        let new_email = data.email.to_lowercase();
        if !claim(&self.emails, &new_email, id) {
            return Err(AppError::conflict("Email is already registered"));
        }
        if !claim(&self.usernames, &data.username, id) {
            if new_email != old_email {
                release(&self.emails, &new_email, id);
            }
            return Err(AppError::conflict("Username is already taken"));
        }
        if new_email != old_email {
            release(&self.emails, &old_email, id);
        }
        if data.username != old_username {
            release(&self.usernames, &old_username, id);
        }

        let updated = match self.principals.get_mut(&id) {
            Some(mut entry) => {
                let principal = entry.value_mut();
                principal.username = data.username;
                principal.first_name = data.first_name;
                principal.last_name = data.last_name;
                principal.email = data.email;
                principal.updated_at = Utc::now();
                principal.updated_by = updated_by;
                principal.clone()
            }
            None => {
                release(&self.emails, &new_email, id);
                release(&self.usernames, &data.username, id);
                return Ok(None);
            }
        };
        Ok(Some(self.hydrate(updated)))
    }

    async fn set_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
        updated_by: Uuid,
    ) -> AppResult<bool> {
        match self.principals.get_mut(&id) {
            Some(mut entry) => {
                let principal = entry.value_mut();
                principal.password_hash = password_hash.to_string();
                principal.updated_at = Utc::now();
                principal.updated_by = updated_by;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_enabled(
        &self,
        id: Uuid,
        enabled: bool,
        updated_by: Uuid,
    ) -> AppResult<Option<Principal>> {
        let updated = match self.principals.get_mut(&id) {
            Some(mut entry) => {
                let principal = entry.value_mut();
                principal.enabled = enabled;
                principal.updated_at = Utc::now();
                principal.updated_by = updated_by;
                principal.clone()
            }
            None => return Ok(None),
        };
        Ok(Some(self.hydrate(updated)))
    }

    async fn delete_principal(&self, id: Uuid) -> AppResult<bool> {
        let Some((_, principal)) = self.principals.remove(&id) else {
            return Ok(false);
        };
        release(&self.emails, &principal.email.to_lowercase(), id);
        release(&self.usernames, &principal.username, id);
        self.assignments.remove(&id);
        Ok(true)
    }

    async fn assign_role(&self, principal_id: Uuid, role_id: i32) -> AppResult<Principal> {
        if !self.roles.contains_key(&role_id) {
            return Err(AppError::not_found("Role not found"));
        }
        let principal = self
            .principals
            .get(&principal_id)
            .map(|p| p.value().clone())
            .ok_or_else(|| AppError::not_found("Principal not found"))?;

        self.assignments
            .entry(principal_id)
            .or_default()
            .insert(role_id);

        Ok(self.hydrate(principal))
    }

    async fn remove_role(&self, principal_id: Uuid, role_id: i32) -> AppResult<bool> {
        Ok(self
            .assignments
            .get_mut(&principal_id)
            .map(|mut held| held.remove(&role_id))
            .unwrap_or(false))
    }

    async fn find_role_by_id(&self, id: i32) -> AppResult<Option<Role>> {
        let role = self.roles.get(&id).map(|r| r.value().clone());
        Ok(role.map(|r| self.with_permissions(r)))
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let id = match self.role_names.get(name) {
            Some(id) => *id.value(),
            None => return Ok(None),
        };
        self.find_role_by_id(id).await
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let mut roles: Vec<Role> = self.roles.iter().map(|r| r.value().clone()).collect();
        roles.sort_by_key(|r| r.id);
        Ok(roles.into_iter().map(|r| self.with_permissions(r)).collect())
    }

    async fn create_role(&self, data: RoleFields) -> AppResult<Role> {
        let id = self.next_role_id.fetch_add(1, Ordering::SeqCst) + 1;
        if !claim(&self.role_names, &data.name, id) {
            return Err(AppError::conflict("Role name already exists"));
        }

        let role = Role {
            id,
            name: data.name,
            description: data.description,
            created_at: Utc::now(),
            permissions: vec![],
        };
        self.roles.insert(id, role.clone());
        Ok(role)
    }

    async fn update_role(&self, id: i32, data: RoleFields) -> AppResult<Option<Role>> {
        let old_name = match self.roles.get(&id) {
            Some(r) => r.name.clone(),
            None => return Ok(None),
        };
        if !claim(&self.role_names, &data.name, id) {
            return Err(AppError::conflict("Role name already exists"));
        }
        if data.name != old_name {
            release(&self.role_names, &old_name, id);
        }

        let updated = match self.roles.get_mut(&id) {
            Some(mut entry) => {
                let role = entry.value_mut();
                role.name = data.name;
                role.description = data.description;
                role.clone()
            }
            None => {
                release(&self.role_names, &data.name, id);
                return Ok(None);
            }
        };
        Ok(Some(self.with_permissions(updated)))
    }

    async fn delete_role(&self, id: i32) -> AppResult<bool> {
        let Some((_, role)) = self.roles.remove(&id) else {
            return Ok(false);
        };
        release(&self.role_names, &role.name, id);
        self.grants.remove(&id);
        for mut held in self.assignments.iter_mut() {
            held.remove(&id);
        }
        Ok(true)
    }

    async fn add_permissions_to_role(
        &self,
        role_id: i32,
        permission_ids: &[i32],
    ) -> AppResult<Role> {
        if !self.roles.contains_key(&role_id) {
            return Err(AppError::not_found("Role not found"));
        }
        if let Some(missing) = permission_ids
            .iter()
            .find(|id| !self.permissions.contains_key(id))
        {
            return Err(AppError::not_found(format!("Permission {missing} not found")));
        }

        self.grants
            .entry(role_id)
            .or_default()
            .extend(permission_ids.iter().copied());

        self.find_role_by_id(role_id)
            .await?
            .ok_or_else(|| AppError::not_found("Role not found"))
    }

    async fn remove_permission_from_role(
        &self,
        role_id: i32,
        permission_id: i32,
    ) -> AppResult<bool> {
        Ok(self
            .grants
            .get_mut(&role_id)
            .map(|mut granted| granted.remove(&permission_id))
            .unwrap_or(false))
    }

    async fn find_permission_by_id(&self, id: i32) -> AppResult<Option<Permission>> {
        Ok(self.permissions.get(&id).map(|p| p.value().clone()))
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        let mut permissions: Vec<Permission> =
            self.permissions.iter().map(|p| p.value().clone()).collect();
        permissions.sort_by_key(|p| p.id);
        Ok(permissions)
    }

    async fn create_permission(&self, data: PermissionFields) -> AppResult<Permission> {
        let id = self.next_permission_id.fetch_add(1, Ordering::SeqCst) + 1;
        if !claim(&self.permission_names, &data.name, id) {
            return Err(AppError::conflict("Permission name already exists"));
        }

        let permission = Permission {
            id,
            name: data.name,
            description: data.description,
            created_at: Utc::now(),
        };
        self.permissions.insert(id, permission.clone());
        Ok(permission)
    }

    async fn update_permission(
        &self,
        id: i32,
        data: PermissionFields,
    ) -> AppResult<Option<Permission>> {
        let old_name = match self.permissions.get(&id) {
            Some(p) => p.name.clone(),
            None => return Ok(None),
        };
        if !claim(&self.permission_names, &data.name, id) {
            return Err(AppError::conflict("Permission name already exists"));
        }
        if data.name != old_name {
            release(&self.permission_names, &old_name, id);
        }

        match self.permissions.get_mut(&id) {
            Some(mut entry) => {
                let permission = entry.value_mut();
                permission.name = data.name;
                permission.description = data.description;
                Ok(Some(permission.clone()))
            }
            None => {
                release(&self.permission_names, &data.name, id);
                Ok(None)
            }
        }
    }

    async fn delete_permission(&self, id: i32) -> AppResult<bool> {
        let Some((_, permission)) = self.permissions.remove(&id) else {
            return Ok(false);
        };
        release(&self.permission_names, &permission.name, id);
        for mut granted in self.grants.iter_mut() {
            granted.remove(&id);
        }
        Ok(true)
    }
}
