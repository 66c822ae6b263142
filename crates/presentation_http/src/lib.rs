//! Arcana HTTP presentation layer
//!
//! Webhook endpoint for bot updates, the update rate-limit middleware and
//! health routes.

pub mod error;
pub mod handlers;
pub mod messages;
pub mod middleware;
pub mod reply;
pub mod routes;
pub mod state;
pub mod update;

pub use error::ApiError;
pub use middleware::{RemainingRequests, UpdateRateLimitLayer};
pub use reply::BotReply;
pub use routes::create_router;
pub use state::AppState;
pub use update::Update;
