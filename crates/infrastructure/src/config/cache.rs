//! Cache configuration with key prefix and TTL settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Namespace prepended to every key, cache and rate limiter alike
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// TTL in seconds used when a caller passes none (default: 1 hour)
    #[serde(default = "default_ttl")]
    pub default_ttl_secs: u64,

    /// TTL of cached accounts (default: 30 minutes)
    #[serde(default = "default_user_ttl")]
    pub user_ttl_secs: u64,

    /// TTL of cached deck lists (default: 1 hour)
    #[serde(default = "default_ttl")]
    pub deck_ttl_secs: u64,

    /// TTL of cached interpretations and advice (default: 1 hour)
    #[serde(default = "default_ttl")]
    pub generation_ttl_secs: u64,
}

fn default_key_prefix() -> String {
    "arcana_bot:".to_string()
}

const fn default_ttl() -> u64 {
    60 * 60 // 1 hour
}

const fn default_user_ttl() -> u64 {
    30 * 60 // 30 minutes
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            default_ttl_secs: default_ttl(),
            user_ttl_secs: default_user_ttl(),
            deck_ttl_secs: default_ttl(),
            generation_ttl_secs: default_ttl(),
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub const fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    #[must_use]
    pub const fn user_ttl(&self) -> Duration {
        Duration::from_secs(self.user_ttl_secs)
    }

    #[must_use]
    pub const fn deck_ttl(&self) -> Duration {
        Duration::from_secs(self.deck_ttl_secs)
    }

    #[must_use]
    pub const fn generation_ttl(&self) -> Duration {
        Duration::from_secs(self.generation_ttl_secs)
    }
}
