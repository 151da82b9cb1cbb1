//! Core traits defined in `identity-core` and implemented by other crates.

pub mod cache;

pub use cache::CacheProvider;
