//! Access token blacklist.

pub mod cache;

pub use cache::RevocationCache;
