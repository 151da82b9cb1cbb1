//! Effective permission resolution over the role graph.

use std::collections::BTreeSet;

use tracing::warn;

use identity_core::error::AppError;
use identity_core::result::AppResult;
use identity_entity::user::Principal;

/// Resolves what a principal may do from the roles it holds.
///
/// Checks are conjunctive: every required permission must be held. An empty
/// requirement is always satisfied.
#[derive(Debug, Clone, Default)]
pub struct PermissionResolver;

impl PermissionResolver {
    /// Creates a new resolver.
    pub fn new() -> Self {
        Self
    }

    /// Union of permission names across all of the principal's roles.
    pub fn effective_permissions(&self, principal: &Principal) -> BTreeSet<String> {
        principal
            .roles
            .iter()
            .flat_map(|role| role.permission_names())
            .map(str::to_string)
            .collect()
    }

    /// Whether the principal holds every permission in `required`.
    pub fn authorize(&self, principal: &Principal, required: &[&str]) -> bool {
        if required.is_empty() {
            return true;
        }
        let held = self.effective_permissions(principal);
        required.iter().all(|name| held.contains(*name))
    }

    /// Like [`authorize`](Self::authorize) but fails with `Forbidden`.
    pub fn require(&self, principal: &Principal, required: &[&str]) -> AppResult<()> {
        if self.authorize(principal, required) {
            Ok(())
        } else {
            warn!(user_id = %principal.id, required = ?required, "Permission denied");
            Err(AppError::forbidden("Forbidden"))
        }
    }
}
