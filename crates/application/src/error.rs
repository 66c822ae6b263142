//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Faults raised by a key-value store backend
///
/// These never cross the cache or rate-limit facades: both swallow them and
/// degrade to a safe default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyStoreError {
    /// Backend unreachable or connection dropped
    #[error("Key store connection error: {0}")]
    Connection(String),

    /// Operation exceeded its deadline
    #[error("Key store operation timed out: {0}")]
    Timeout(String),

    /// Backend rejected or failed the command
    #[error("Key store command failed: {0}")]
    Command(String),

    /// Key holds a value of a different kind than the operation expects
    #[error("Key store type mismatch for key: {0}")]
    WrongType(String),
}

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Key-value store fault
    #[error(transparent)]
    KeyStore(#[from] KeyStoreError),

    /// Text generation failed
    #[error("Generation error: {0}")]
    Generation(String),

    /// Account repository failed
    #[error("Repository error: {0}")]
    Repository(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
