//! User account service
//!
//! Read-through access to accounts plus the credit and referral flows.

use std::{fmt, sync::Arc, time::Duration};

use domain::{SubjectId, UserAccount};
use tracing::{debug, info, instrument, warn};

use crate::{error::ApplicationError, ports::UserRepositoryPort, services::CacheService};

/// Prefix of start parameters carrying a referrer
const REFERRAL_PARAM_PREFIX: &str = "friend_";

/// Longest accepted start parameter
const MAX_REFERRAL_PARAM_LEN: usize = 50;

/// Cache key of an account
#[must_use]
pub fn user_cache_key(id: SubjectId) -> String {
    format!("user:{id}")
}

/// Extract the referrer from a `friend_<id>` start parameter
#[must_use]
pub fn parse_referral_param(param: &str) -> Option<SubjectId> {
    if param.len() > MAX_REFERRAL_PARAM_LEN {
        return None;
    }
    let digits = param.strip_prefix(REFERRAL_PARAM_PREFIX)?;
    if digits.is_empty() || digits.len() > 15 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Account defaults and cache settings
#[derive(Debug, Clone)]
pub struct AccountSettings {
    /// Credits granted to a new account
    pub default_balance: u32,
    /// Credits granted to both sides of a referral
    pub referral_bonus: u32,
    /// Lifetime of cached accounts
    pub cache_ttl: Duration,
    /// Bot handle used in referral links
    pub bot_username: String,
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            default_balance: 10,
            referral_bonus: 10,
            cache_ttl: Duration::from_secs(1800),
            bot_username: "arcana_bot".to_string(),
        }
    }
}

/// Result of [`UserService::get_or_create`]
#[derive(Debug, Clone)]
pub struct EnsuredAccount {
    pub account: UserAccount,
    /// Whether the account was created by this call
    pub created: bool,
}

/// Account use cases
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepositoryPort>,
    cache: CacheService,
    settings: AccountSettings,
}

impl fmt::Debug for UserService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserService")
            .field("cache", &self.cache)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl UserService {
    #[must_use]
    pub fn new(
        repository: Arc<dyn UserRepositoryPort>,
        cache: CacheService,
        settings: AccountSettings,
    ) -> Self {
        Self {
            repository,
            cache,
            settings,
        }
    }

    /// Load an account, creating it with the default balance if missing
    #[instrument(skip(self), level = "debug")]
    pub async fn get_or_create(&self, id: SubjectId) -> Result<EnsuredAccount, ApplicationError> {
        let key = user_cache_key(id);
        if let Some(account) = self.cache.get::<UserAccount>(&key).await {
            return Ok(EnsuredAccount {
                account,
                created: false,
            });
        }

        let (account, created) = match self.repository.get(id).await? {
            Some(account) => (account, false),
            None => {
                let account = self
                    .repository
                    .create(id, self.settings.default_balance)
                    .await?;
                info!(subject = %id, balance = account.balance(), "Created account");
                (account, true)
            },
        };

        self.cache
            .set(&key, &account, Some(self.settings.cache_ttl))
            .await;
        Ok(EnsuredAccount { account, created })
    }

    /// Whether the subject has credits left
    ///
    /// Reads the repository directly so a stale cached balance never grants a
    /// message. Any fault answers `false`.
    #[instrument(skip(self), level = "debug")]
    pub async fn can_send_message(&self, id: SubjectId) -> bool {
        match self.repository.get(id).await {
            Ok(Some(account)) => account.has_credits(),
            Ok(None) => false,
            Err(e) => {
                warn!(subject = %id, error = %e, "Failed to read balance");
                false
            },
        }
    }

    /// Spend one credit
    ///
    /// Returns `false` when nothing was spent.
    #[instrument(skip(self), level = "debug")]
    pub async fn consume_message(&self, id: SubjectId) -> bool {
        match self.repository.decrement_balance_if_positive(id).await {
            Ok(spent) => {
                if spent {
                    self.cache.delete(&user_cache_key(id)).await;
                }
                spent
            },
            Err(e) => {
                warn!(subject = %id, error = %e, "Failed to spend credit");
                false
            },
        }
    }

    /// Grant the referral bonus to both accounts and record the referral
    ///
    /// Self-referrals are refused. Returns `false` when nothing was granted.
    #[instrument(skip(self), level = "debug")]
    pub async fn process_referral(&self, new_user: SubjectId, referrer: SubjectId) -> bool {
        if new_user == referrer {
            debug!(subject = %new_user, "Ignoring self-referral");
            return false;
        }
        match self.try_process_referral(new_user, referrer).await {
            Ok(granted) => granted,
            Err(e) => {
                warn!(%new_user, %referrer, error = %e, "Referral processing failed");
                false
            },
        }
    }

    async fn try_process_referral(
        &self,
        new_user: SubjectId,
        referrer: SubjectId,
    ) -> Result<bool, ApplicationError> {
        let bonus = self.settings.referral_bonus;
        if !self.repository.add_credits(new_user, bonus).await? {
            return Ok(false);
        }
        self.cache.delete(&user_cache_key(new_user)).await;

        if !self.repository.add_credits(referrer, bonus).await? {
            return Ok(false);
        }

        if let Some(mut account) = self.repository.get(referrer).await? {
            account.record_referral(new_user);
            self.repository.update(&account).await?;
        }
        self.cache.delete(&user_cache_key(referrer)).await;

        info!(%new_user, %referrer, bonus, "Referral processed");
        Ok(true)
    }

    /// Link that starts the bot with this subject as referrer
    #[must_use]
    pub fn referral_link(&self, id: SubjectId) -> String {
        format!(
            "https://t.me/{}?start={REFERRAL_PARAM_PREFIX}{id}",
            self.settings.bot_username
        )
    }
}
