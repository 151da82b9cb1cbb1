//! HTTP request handlers organized by domain.

pub mod auth;
pub mod health;
pub mod permission;
pub mod role;
pub mod user;
