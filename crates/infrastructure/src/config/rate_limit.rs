//! Rate-limit configuration.

use std::{collections::HashMap, time::Duration};

use domain::{DomainError, RateLimitAction, RateLimitPolicy};
use serde::{Deserialize, Serialize};

use super::default_true;

/// One policy override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Requests admitted per window
    pub max_requests: u32,
    /// Window length in seconds
    pub window_secs: u64,
    /// Block length in seconds after a violation
    #[serde(default = "default_block_secs")]
    pub block_secs: u64,
}

const fn default_block_secs() -> u64 {
    RateLimitPolicy::DEFAULT_BLOCK.as_secs()
}

impl PolicyConfig {
    pub fn to_policy(self) -> Result<RateLimitPolicy, DomainError> {
        RateLimitPolicy::new(
            self.max_requests,
            Duration::from_secs(self.window_secs),
            Duration::from_secs(self.block_secs),
        )
    }
}

/// Rate-limit configuration
///
/// Overrides are keyed by action name (`message`, `callback`, `start`); actions
/// without an override keep their built-in policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Whether inbound updates are rate limited
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Per-action policy overrides
    #[serde(default)]
    pub policies: HashMap<String, PolicyConfig>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            policies: HashMap::new(),
        }
    }
}

impl RateLimitConfig {
    /// Built-in policies with the configured overrides applied
    pub fn resolve_policies(
        &self,
    ) -> Result<HashMap<RateLimitAction, RateLimitPolicy>, DomainError> {
        let mut policies: HashMap<RateLimitAction, RateLimitPolicy> = RateLimitAction::ALL
            .into_iter()
            .map(|action| (action, RateLimitPolicy::default_for(action)))
            .collect();

        for (name, policy) in &self.policies {
            let action: RateLimitAction = name.parse()?;
            policies.insert(action, policy.to_policy()?);
        }
        Ok(policies)
    }
}
