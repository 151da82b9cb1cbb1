//! Cache configuration.

use serde::{Deserialize, Serialize};

/// In-memory cache configuration.
///
/// Entry lifetimes are set per insert; only the capacity is global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries held at once.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
        }
    }
}

fn default_max_capacity() -> u64 {
    100_000
}
