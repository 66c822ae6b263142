//! Application state shared across handlers

use std::{fmt, sync::Arc};

use application::{CacheService, RateLimitService, ReadingService, UserRepositoryPort, UserService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Account use cases
    pub users: Arc<UserService>,
    /// Reading use cases
    pub readings: Arc<ReadingService>,
    /// Cache facade, used by readiness checks
    pub cache: CacheService,
    /// Limiter consulted by the update middleware
    pub rate_limiter: Arc<RateLimitService>,
    /// Account store, used by readiness checks
    pub repository: Arc<dyn UserRepositoryPort>,
    /// Whether the update middleware consults the limiter
    pub rate_limit_enabled: bool,
    /// Largest update body the middleware buffers
    pub max_body_bytes: usize,
    /// Credits granted to both sides of a referral
    pub referral_bonus: u32,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("cache", &self.cache)
            .field("rate_limiter", &self.rate_limiter)
            .field("rate_limit_enabled", &self.rate_limit_enabled)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish_non_exhaustive()
    }
}
