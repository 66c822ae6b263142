//! Redis container wrapper for testcontainers integration.

use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::redis::Redis;
use tracing::{debug, info};

/// Configuration for Redis container
#[derive(Debug, Clone)]
pub struct RedisContainerConfig {
    /// Redis version tag (e.g., "7-alpine")
    pub version: String,
}

impl Default for RedisContainerConfig {
    fn default() -> Self {
        Self {
            version: "7-alpine".to_string(),
        }
    }
}

/// Running Redis container; stopped when dropped.
#[derive(Debug)]
pub struct RedisContainer {
    _container: ContainerAsync<Redis>,
    connection_string: String,
}

impl RedisContainer {
    /// Start a new Redis container with default configuration.
    pub async fn start() -> Result<Self, ContainerError> {
        Self::start_with_config(RedisContainerConfig::default()).await
    }

    /// Start a new Redis container with custom configuration.
    pub async fn start_with_config(config: RedisContainerConfig) -> Result<Self, ContainerError> {
        info!(version = %config.version, "Starting Redis container");

        let container = Redis::default()
            .with_tag(&config.version)
            .start()
            .await
            .map_err(|e| ContainerError::Start(e.to_string()))?;

        let host = container
            .get_host()
            .await
            .map_err(|e| ContainerError::Start(e.to_string()))?;

        let port = container
            .get_host_port_ipv4(6379)
            .await
            .map_err(|e| ContainerError::Start(e.to_string()))?;

        let connection_string = format!("redis://{host}:{port}");
        debug!(%connection_string, "Redis container started");

        Ok(Self {
            _container: container,
            connection_string,
        })
    }

    /// Connection URL for this Redis instance.
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }
}

/// Errors that can occur when working with containers
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// Container failed to start
    #[error("Container failed to start: {0}")]
    Start(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redis_config_default() {
        assert_eq!(RedisContainerConfig::default().version, "7-alpine");
    }

    #[test]
    fn container_error_display() {
        let error = ContainerError::Start("no docker".to_string());
        assert!(error.to_string().contains("no docker"));
    }
}
