//! Infrastructure startup errors

use application::error::KeyStoreError;
use thiserror::Error;

use crate::persistence::AsyncDatabaseError;

/// Errors raised while wiring adapters at startup
#[derive(Debug, Error)]
pub enum InfrastructureError {
    /// Configuration could not be loaded
    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    /// Configuration loaded but is unusable
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Database pool or migrations failed
    #[error(transparent)]
    Database(#[from] AsyncDatabaseError),

    /// Key store could not be set up
    #[error(transparent)]
    KeyStore(#[from] KeyStoreError),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}
