//! Shared key store (Redis) configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::default_true;

/// Redis connection settings
///
/// When disabled, or when the startup probe fails, the cache and the rate
/// limiter each run on their own in-process store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Whether to try the shared store at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Connection URL
    #[serde(default = "default_url")]
    pub url: String,

    /// Connect timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Per-operation timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub response_timeout_secs: u64,
}

fn default_url() -> String {
    "redis://localhost:6379".to_string()
}

const fn default_timeout_secs() -> u64 {
    5
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_url(),
            connect_timeout_secs: default_timeout_secs(),
            response_timeout_secs: default_timeout_secs(),
        }
    }
}

impl RedisConfig {
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    #[must_use]
    pub const fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.response_timeout_secs)
    }
}
