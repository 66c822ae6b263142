//! Application services - Use case implementations

mod cache_service;
mod rate_limit_service;
mod reading_service;
mod user_service;

pub use cache_service::{CacheService, DEFAULT_TTL, derive_cache_key};
pub use rate_limit_service::{RateLimitService, block_key, window_key};
pub use reading_service::{
    FALLBACK_ADVICE, ReadingService, ReadingSettings, deck_cache_key, fallback_interpretation,
};
pub use user_service::{
    AccountSettings, EnsuredAccount, UserService, parse_referral_param, user_cache_key,
};
