//! HTTP middleware components

pub mod rate_limit;

pub use rate_limit::{RemainingRequests, UpdateRateLimitLayer, UpdateRateLimiter};
