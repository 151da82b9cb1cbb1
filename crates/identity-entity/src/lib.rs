//! # identity-entity
//!
//! Domain entity models for the identity service. Every struct in this
//! crate represents a database table row or a domain value object.
//! Database entities derive `sqlx::FromRow`; relations loaded by separate
//! queries are marked `#[sqlx(skip)]`.

pub mod permission;
pub mod role;
pub mod session;
pub mod user;
