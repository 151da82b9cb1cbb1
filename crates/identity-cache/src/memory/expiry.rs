//! Per-entry expiry policy for the moka cache.

use std::time::{Duration, Instant};

use moka::Expiry;

/// A cached value together with the lifetime it was inserted with.
#[derive(Debug, Clone)]
pub struct TimedEntry {
    /// Stored value.
    pub value: String,
    /// Lifetime from the moment of insert or replace.
    pub ttl: Duration,
}

/// Expires each entry after the TTL carried by the entry itself.
///
/// Replacing a key restarts its clock with the new entry's TTL; reads
/// leave the remaining lifetime untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerEntryTtl;

impl Expiry<String, TimedEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &TimedEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &TimedEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}
