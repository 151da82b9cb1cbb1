//! # identity-core
//!
//! Core crate for the identity service. Contains the unified error system,
//! configuration schemas, and the cache provider trait.
//!
//! This crate has **no** internal dependencies on other identity crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
