//! Orchestration of the auth components.

pub mod account;
pub mod auth;
pub mod role;

pub use account::{AccountService, Signup};
pub use auth::{AuthService, LoginResponse};
pub use role::RoleService;
