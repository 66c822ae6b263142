//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `redis`: Shared key store connection
//! - `cache`: Key prefix and TTLs
//! - `rate_limit`: Per-action policy overrides
//! - `generation`: Text generation API
//! - `database`: Account database URL and pool
//! - `account`: Credit and referral defaults
//! - `telemetry`: Log output
//!
//! Sources, lowest precedence first: built-in defaults, an optional
//! `config.toml`, then `ARCANA_`-prefixed environment variables with `__` as
//! the section separator (e.g. `ARCANA_REDIS__URL`).

mod account;
mod cache;
mod database;
mod generation;
mod rate_limit;
mod redis;
mod server;
mod telemetry;

use serde::{Deserialize, Serialize};

pub use account::AccountConfig;
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use generation::GenerationConfig;
pub use rate_limit::{PolicyConfig, RateLimitConfig};
pub use redis::RedisConfig;
pub use server::ServerConfig;
pub use telemetry::TelemetryConfig;

use crate::error::InfrastructureError;

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Environment variable prefix
pub const ENV_PREFIX: &str = "ARCANA";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Shared key store configuration
    #[serde(default)]
    pub redis: RedisConfig,

    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Rate-limit configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Text generation configuration
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Account database
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Account defaults
    #[serde(default)]
    pub account: AccountConfig,

    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (optional) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the named file (optional) and the environment
    pub fn load_from(file: &str) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name(file).required(false))
            // Override with environment variables (e.g., ARCANA_SERVER__PORT)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Reject settings the process cannot run with
    ///
    /// An empty key prefix, or one containing glob characters, would make
    /// prefix clears reach outside this process's namespace.
    pub fn validate(&self) -> Result<(), InfrastructureError> {
        validate_key_prefix(&self.cache.key_prefix)?;
        self.database.validate()?;
        self.rate_limit
            .resolve_policies()
            .map_err(|e| InfrastructureError::Configuration(e.to_string()))?;
        if self.redis.enabled && self.redis.url.trim().is_empty() {
            return Err(InfrastructureError::Configuration(
                "redis.url must not be empty when redis is enabled".to_string(),
            ));
        }
        Ok(())
    }
}

/// Check that a key prefix is non-empty and free of glob metacharacters
pub fn validate_key_prefix(prefix: &str) -> Result<(), InfrastructureError> {
    if prefix.is_empty() {
        return Err(InfrastructureError::Configuration(
            "cache.key_prefix must not be empty".to_string(),
        ));
    }
    if prefix
        .chars()
        .any(|c| matches!(c, '*' | '?' | '[' | ']' | '\\') || c.is_whitespace())
    {
        return Err(InfrastructureError::Configuration(format!(
            "cache.key_prefix contains reserved characters: {prefix:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.cache.key_prefix, "arcana_bot:");
        assert_eq!(config.cache.default_ttl_secs, 3600);
        assert_eq!(config.cache.user_ttl_secs, 1800);
        assert_eq!(config.redis.connect_timeout_secs, 5);
        assert_eq!(config.redis.response_timeout_secs, 5);
        assert_eq!(config.generation.model, "gpt-4o-mini");
        assert_eq!(config.generation.max_tokens, 500);
        assert!((config.generation.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.account.default_balance, 10);
        assert_eq!(config.account.referral_bonus, 10);
        assert!(config.rate_limit.enabled);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_prefix_is_rejected() {
        assert!(validate_key_prefix("").is_err());
    }

    #[test]
    fn glob_prefix_is_rejected() {
        assert!(validate_key_prefix("arcana*").is_err());
        assert!(validate_key_prefix("a[b]:").is_err());
        assert!(validate_key_prefix("has space:").is_err());
    }

    #[test]
    fn invalid_policy_override_fails_validation() {
        let mut config = AppConfig::default();
        config.rate_limit.policies.insert(
            "message".to_string(),
            PolicyConfig {
                max_requests: 0,
                window_secs: 60,
                block_secs: 300,
            },
        );
        assert!(matches!(
            config.validate(),
            Err(InfrastructureError::Configuration(_))
        ));
    }

    #[test]
    fn deserializes_partial_toml() {
        let raw = r#"
            [redis]
            enabled = false

            [cache]
            key_prefix = "test:"

            [rate_limit.policies.start]
            max_requests = 2
            window_secs = 30
        "#;
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(!config.redis.enabled);
        assert_eq!(config.cache.key_prefix, "test:");
        assert_eq!(config.cache.user_ttl_secs, 1800);
        assert_eq!(config.rate_limit.policies["start"].block_secs, 300);
    }
}
