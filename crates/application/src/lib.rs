//! Application layer - Use cases and orchestration
//!
//! Contains the port definitions and the services built on them: the cache
//! facade, the sliding-window rate limiter and the account and reading use
//! cases. Adapters live in the infrastructure layer.

pub mod error;
pub mod ports;
pub mod services;

pub use error::{ApplicationError, KeyStoreError};
pub use ports::*;
pub use services::*;
