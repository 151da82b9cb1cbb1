//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use identity_auth::{AccountService, AuthService, RoleService};
use identity_cache::provider::CacheManager;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Login, refresh, logout, token verification and authorization.
    pub auth: Arc<AuthService>,
    /// Signup and principal management.
    pub accounts: Arc<AccountService>,
    /// Roles, permissions and their grants.
    pub roles: Arc<RoleService>,
    /// Cache manager backing the revocation cache.
    pub cache: Arc<CacheManager>,
}

impl AppState {
    /// Assembles the state from constructed services.
    pub fn new(
        auth: Arc<AuthService>,
        accounts: Arc<AccountService>,
        roles: Arc<RoleService>,
        cache: Arc<CacheManager>,
    ) -> Self {
        Self {
            auth,
            accounts,
            roles,
            cache,
        }
    }
}
