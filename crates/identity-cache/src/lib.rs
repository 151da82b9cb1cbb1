//! # identity-cache
//!
//! Cache provider implementations for the identity service.
//!
//! - **memory**: in-process cache using [moka](https://crates.io/crates/moka)
//!   with a lifetime chosen per entry.
//!
//! Callers hold a [`CacheManager`], which dispatches to the configured
//! provider.

pub mod keys;
pub mod memory;
pub mod provider;

pub use provider::CacheManager;
