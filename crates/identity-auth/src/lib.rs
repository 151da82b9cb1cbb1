//! # identity-auth
//!
//! Authentication and authorization core of the identity service.
//!
//! ## Modules
//!
//! - `jwt`: HS512 access token issuing and verification
//! - `revocation`: per-principal access token blacklist with per-entry TTL
//! - `session`: per-device refresh secrets with single-use rotation
//! - `rbac`: effective permission resolution and conjunctive checks
//! - `password`: Argon2id hashing and signup password policy
//! - `service`: login, refresh, logout, authorization, account and role graph flows

pub mod jwt;
pub mod password;
pub mod rbac;
pub mod revocation;
pub mod service;
pub mod session;

pub use jwt::{AccessTokenClaims, IssuedToken, TokenCodec};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::PermissionResolver;
pub use revocation::RevocationCache;
pub use service::{AccountService, AuthService, LoginResponse, RoleService, Signup};
pub use session::{OpenedSession, SessionStore};
