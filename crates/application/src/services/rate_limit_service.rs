//! Sliding-window rate limiter
//!
//! Admission control per (subject, action). Each action has a policy of at
//! most N requests per trailing window; the first request over the limit
//! writes a block marker that rejects the subject until it expires.
//!
//! Storage layout (logical keys, the store adds the namespace prefix):
//! - `rate_limit:{action}:{subject}` holds the window timestamps
//! - `blocked:rate_limit:{action}:{subject}` is the block marker
//!
//! The block check and the window update are two separate store calls, so a
//! request racing a concurrent block write may still be recorded in the
//! window. It is rejected either way once the marker exists.

use std::{collections::HashMap, fmt, sync::Arc};

use domain::{RateLimitAction, RateLimitPolicy, SubjectId};
use tracing::{debug, instrument, warn};

use crate::{
    error::KeyStoreError,
    ports::{Clock, KeyStorePort},
};

/// Key holding the window timestamps
#[must_use]
pub fn window_key(action: RateLimitAction, subject: SubjectId) -> String {
    format!("rate_limit:{action}:{subject}")
}

/// Key of the block marker
#[must_use]
pub fn block_key(action: RateLimitAction, subject: SubjectId) -> String {
    format!("blocked:{}", window_key(action, subject))
}

/// Rate limiter over the bound key store
#[derive(Clone)]
pub struct RateLimitService {
    store: Arc<dyn KeyStorePort>,
    clock: Arc<dyn Clock>,
    policies: HashMap<RateLimitAction, RateLimitPolicy>,
}

impl fmt::Debug for RateLimitService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimitService")
            .field("backend", &self.store.kind())
            .field("policies", &self.policies)
            .finish_non_exhaustive()
    }
}

impl RateLimitService {
    /// Create a limiter with the built-in policy for every action
    #[must_use]
    pub fn new(store: Arc<dyn KeyStorePort>, clock: Arc<dyn Clock>) -> Self {
        let policies = RateLimitAction::ALL
            .into_iter()
            .map(|action| (action, RateLimitPolicy::default_for(action)))
            .collect();
        Self::with_policies(store, clock, policies)
    }

    /// Create a limiter with an explicit policy table
    ///
    /// Actions missing from the table are not limited.
    #[must_use]
    pub fn with_policies(
        store: Arc<dyn KeyStorePort>,
        clock: Arc<dyn Clock>,
        policies: HashMap<RateLimitAction, RateLimitPolicy>,
    ) -> Self {
        for (action, policy) in &policies {
            if !policy.block_covers_window() {
                warn!(
                    %action,
                    window_secs = policy.window().as_secs(),
                    block_secs = policy.block_duration().as_secs(),
                    "Block shorter than window, subjects may be re-blocked right after a block ends"
                );
            }
        }
        Self {
            store,
            clock,
            policies,
        }
    }

    /// Policy applied to an action, if any
    pub fn policy(&self, action: RateLimitAction) -> Option<RateLimitPolicy> {
        self.policies.get(&action).copied()
    }

    /// Decide whether a request may proceed and record it
    ///
    /// Actions without a policy are always allowed. Backend faults allow the
    /// request.
    #[instrument(skip(self), level = "debug")]
    pub async fn is_allowed(&self, subject: SubjectId, action: RateLimitAction) -> bool {
        match self.policy(action) {
            Some(policy) => self.check(subject, action, policy).await,
            None => true,
        }
    }

    /// Like [`Self::is_allowed`] with a caller-supplied policy
    #[instrument(skip(self), level = "debug")]
    pub async fn is_allowed_with(
        &self,
        subject: SubjectId,
        action: RateLimitAction,
        policy: RateLimitPolicy,
    ) -> bool {
        self.check(subject, action, policy).await
    }

    /// Requests still permitted in the current window
    ///
    /// Nothing is recorded. `None` means the action is not limited; a backend
    /// fault reports the full allowance.
    #[instrument(skip(self), level = "debug")]
    pub async fn remaining(&self, subject: SubjectId, action: RateLimitAction) -> Option<u32> {
        let policy = self.policy(action)?;
        let max = policy.max_requests();
        let key = window_key(action, subject);

        match self
            .store
            .window_count(&key, policy.window(), self.clock.now_ms())
            .await
        {
            Ok(count) => Some(max.saturating_sub(u32::try_from(count).unwrap_or(u32::MAX))),
            Err(e) => {
                warn!(%subject, %action, error = %e, "Failed to read rate-limit window");
                Some(max)
            },
        }
    }

    async fn check(
        &self,
        subject: SubjectId,
        action: RateLimitAction,
        policy: RateLimitPolicy,
    ) -> bool {
        match self.try_check(subject, action, policy).await {
            Ok(allowed) => allowed,
            Err(e) => {
                warn!(%subject, %action, error = %e, "Rate-limit backend fault, allowing request");
                true
            },
        }
    }

    async fn try_check(
        &self,
        subject: SubjectId,
        action: RateLimitAction,
        policy: RateLimitPolicy,
    ) -> Result<bool, KeyStoreError> {
        let now_ms = self.clock.now_ms();
        let block = block_key(action, subject);

        if self.store.exists(&block).await? {
            debug!(%subject, %action, "Subject is blocked");
            return Ok(false);
        }

        let count = self
            .store
            .atomic_window_update(&window_key(action, subject), policy.window(), now_ms)
            .await?;

        if count > u64::from(policy.max_requests()) {
            let blocked = self
                .store
                .set_if_absent(&block, "1", policy.block_duration())
                .await?;
            if blocked {
                warn!(
                    %subject,
                    %action,
                    count,
                    block_secs = policy.block_duration().as_secs(),
                    "Rate limit exceeded, subject blocked"
                );
            }
            return Ok(false);
        }

        Ok(true)
    }
}
