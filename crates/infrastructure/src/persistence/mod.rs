//! Persistence module
//!
//! SQLite-based account storage via sqlx.

pub mod async_connection;
pub mod error;
pub mod user_store;

pub use async_connection::{AsyncDatabase, AsyncDatabaseConfig, AsyncDatabaseError};
pub use error::map_sqlx_error;
pub use user_store::SqliteUserRepository;
