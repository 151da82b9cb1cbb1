//! Principal (user) domain entities.

pub mod model;
pub mod provider;

pub use model::{CreatePrincipal, Principal, UpdatePrincipal};
pub use provider::AuthProvider;
