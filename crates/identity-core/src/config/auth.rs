//! Authentication configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Token signing and credential configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Process-wide secret for HMAC-SHA-512 token signing.
    #[serde(default)]
    pub jwt_secret: String,
    /// Access token TTL in milliseconds.
    #[serde(default = "default_access_ttl_ms")]
    pub access_token_ttl_ms: u64,
    /// Device session (refresh secret) lifetime in hours.
    #[serde(default = "default_refresh_ttl_hours")]
    pub refresh_ttl_hours: u64,
    /// Minimum password length accepted at signup.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_token_ttl_ms: default_access_ttl_ms(),
            refresh_ttl_hours: default_refresh_ttl_hours(),
            password_min_length: default_password_min(),
        }
    }
}

impl AuthConfig {
    /// Access token lifetime.
    pub fn access_ttl(&self) -> Duration {
        Duration::from_millis(self.access_token_ttl_ms)
    }

    /// Device session lifetime.
    pub fn refresh_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_ttl_hours * 3600)
    }

    /// Rejects settings the service cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must be set"));
        }
        if self.access_token_ttl_ms == 0 {
            return Err(AppError::configuration(
                "auth.access_token_ttl_ms must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("access_token_ttl_ms", &self.access_token_ttl_ms)
            .field("refresh_ttl_hours", &self.refresh_ttl_hours)
            .field("password_min_length", &self.password_min_length)
            .finish()
    }
}

fn default_access_ttl_ms() -> u64 {
    15 * 60 * 1000
}

fn default_refresh_ttl_hours() -> u64 {
    24 * 30
}

fn default_password_min() -> usize {
    8
}
