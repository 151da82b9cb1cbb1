//! In-memory cache backend.

pub mod expiry;
pub mod store;

pub use store::MemoryCacheProvider;
