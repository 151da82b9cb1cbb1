//! Device sessions and refresh secrets.

pub mod secret;
pub mod store;

pub use store::{OpenedSession, SessionStore};
