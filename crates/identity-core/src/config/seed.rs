//! Seed data configuration.

use serde::{Deserialize, Serialize};

/// Initial system administrator created on first start.
///
/// When `email` or `password` is empty no administrator is seeded; roles
/// and permissions are always seeded.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Administrator login name.
    #[serde(default)]
    pub username: String,
    /// Administrator first name.
    #[serde(default)]
    pub firstname: String,
    /// Administrator last name.
    #[serde(default)]
    pub lastname: String,
    /// Administrator email (login identifier).
    #[serde(default)]
    pub email: String,
    /// Administrator plaintext password, hashed before storage.
    #[serde(default)]
    pub password: String,
}

impl SeedConfig {
    /// Whether an administrator account should be seeded.
    pub fn has_admin(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

impl std::fmt::Debug for SeedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedConfig")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
