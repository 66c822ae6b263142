//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: Redis and in-memory
//! key stores, the SQLite account repository, the text generation client,
//! configuration loading and tracing setup.

pub mod adapters;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod persistence;
pub mod telemetry;
#[cfg(test)]
pub mod testing;

pub use adapters::OpenAiGenerationAdapter;
pub use cache::{KeyStoreBackends, MemoryKeyStore, RedisKeyStore, select_backend};
pub use clock::SystemClock;
pub use config::{
    AccountConfig, AppConfig, CacheConfig, DatabaseConfig, GenerationConfig, PolicyConfig,
    RateLimitConfig, RedisConfig, ServerConfig, TelemetryConfig,
};
pub use error::InfrastructureError;
pub use persistence::{AsyncDatabase, AsyncDatabaseConfig, SqliteUserRepository};
pub use telemetry::{TelemetryError, init_tracing};
