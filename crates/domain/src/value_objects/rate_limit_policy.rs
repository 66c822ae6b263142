//! Rate-limit policy value object

use std::time::Duration;

use crate::{errors::DomainError, value_objects::RateLimitAction};

/// Sliding-window policy for one action
///
/// At most `max_requests` are admitted within any trailing `window`. The
/// first request over the limit blocks the subject for `block_duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    max_requests: u32,
    window: Duration,
    block_duration: Duration,
}

impl RateLimitPolicy {
    /// Block duration applied when none is specified
    pub const DEFAULT_BLOCK: Duration = Duration::from_secs(300);

    /// Create a policy, rejecting zero limits and zero windows
    pub fn new(
        max_requests: u32,
        window: Duration,
        block_duration: Duration,
    ) -> Result<Self, DomainError> {
        if max_requests == 0 {
            return Err(DomainError::InvalidPolicy(
                "max_requests must be at least 1".to_string(),
            ));
        }
        if window.is_zero() {
            return Err(DomainError::InvalidPolicy(
                "window must be positive".to_string(),
            ));
        }
        if block_duration.is_zero() {
            return Err(DomainError::InvalidPolicy(
                "block duration must be positive".to_string(),
            ));
        }
        Ok(Self {
            max_requests,
            window,
            block_duration,
        })
    }

    /// Built-in policy for a predefined action
    #[must_use]
    pub const fn default_for(action: RateLimitAction) -> Self {
        match action {
            RateLimitAction::Message => Self::from_secs(10, 60, 300),
            RateLimitAction::Callback => Self::from_secs(20, 60, 300),
            RateLimitAction::Start => Self::from_secs(5, 300, 300),
        }
    }

    const fn from_secs(max_requests: u32, window_secs: u64, block_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
            block_duration: Duration::from_secs(block_secs),
        }
    }

    /// Maximum admitted requests per window
    #[must_use]
    pub const fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Trailing window length
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Block length after a violation
    #[must_use]
    pub const fn block_duration(&self) -> Duration {
        self.block_duration
    }

    /// Whether a block outlives the window
    ///
    /// When it does not, timestamps recorded before the block may still be
    /// inside the window once the block ends, and the subject is blocked again
    /// on its next request.
    #[must_use]
    pub fn block_covers_window(&self) -> bool {
        self.block_duration >= self.window
    }
}
