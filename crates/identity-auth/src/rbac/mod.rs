//! Role-based access control.

pub mod resolver;

pub use resolver::PermissionResolver;
