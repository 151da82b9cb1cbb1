//! Permission domain entities and well-known permission names.

pub mod model;
pub mod names;

pub use model::{Permission, PermissionFields};
