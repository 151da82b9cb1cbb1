//! Cache key builders.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

use uuid::Uuid;

/// Prefix applied to all identity cache keys.
const PREFIX: &str = "identity";

/// Cache key holding the most recently revoked access token of a principal.
///
/// One key per principal, so revoking for one principal never touches
/// another principal's entry.
pub fn revoked_access_token(principal_id: Uuid) -> String {
    format!("{PREFIX}:auth:revoked:{principal_id}")
}

/// Cache key used by the health probe.
pub fn health_probe() -> String {
    format!("{PREFIX}:health:probe")
}
