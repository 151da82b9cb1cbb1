//! Refresh secret generation and hashing.

use rand::Rng;
use rand::distributions::Alphanumeric;
use sha2::{Digest, Sha256};

/// Length of a refresh secret in characters.
pub const REFRESH_SECRET_LEN: usize = 64;

/// Generates a random alphanumeric refresh secret.
pub fn generate() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(REFRESH_SECRET_LEN)
        .map(char::from)
        .collect()
}

/// SHA-256 of a refresh secret, lowercase hex. Only this form is stored.
pub fn hash(secret: &str) -> String {
    format!("{:x}", Sha256::digest(secret.as_bytes()))
}
