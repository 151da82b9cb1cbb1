//! Custom Axum extractors.

pub mod auth;
pub mod bearer;

pub use auth::AuthUser;
pub use bearer::BearerToken;
