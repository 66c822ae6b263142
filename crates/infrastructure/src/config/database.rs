//! Account database settings.

use serde::{Deserialize, Serialize};

use super::default_true;
use crate::error::InfrastructureError;

/// Where the account table lives and how the pool is sized
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection URL, `sqlite:<file>` or `sqlite::memory:`
    #[serde(default = "default_url")]
    pub url: String,

    /// Pool size; zero is treated as one
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// Apply `migrations/` before serving
    #[serde(default = "default_true")]
    pub migrate_on_start: bool,

    /// Journal in WAL mode (skipped for in-memory databases)
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

fn default_url() -> String {
    "sqlite:arcana.db".to_string()
}

const fn default_pool_size() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            pool_size: default_pool_size(),
            migrate_on_start: true,
            wal_mode: true,
        }
    }
}

impl DatabaseConfig {
    /// Whether accounts vanish with the process
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:")
    }

    /// Only SQLite URLs are accepted; the repository speaks SQLite dialect
    pub fn validate(&self) -> Result<(), InfrastructureError> {
        let Some(target) = self.url.strip_prefix("sqlite:") else {
            return Err(InfrastructureError::Configuration(format!(
                "database.url must be a sqlite URL, got {:?}",
                self.url
            )));
        };
        if target.trim_start_matches('/').is_empty() {
            return Err(InfrastructureError::Configuration(
                "database.url names no database file".to_string(),
            ));
        }
        Ok(())
    }
}
