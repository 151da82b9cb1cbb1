//! In-memory store implementations backed by dashmap.
//!
//! Used by tests and by embedders that do not need durable storage.

pub mod credential;
pub mod session;

pub use credential::MemoryCredentialStore;
pub use session::MemorySessionRepository;
