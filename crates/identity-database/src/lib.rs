//! # identity-database
//!
//! Credential store and device session persistence. Defines the narrow
//! store traits the auth core calls through, with PostgreSQL
//! implementations for production and in-memory implementations for tests
//! and embedding.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod seed;
pub mod traits;

pub use connection::DatabasePool;
pub use traits::{CredentialStore, SessionRepository};
