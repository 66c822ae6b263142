//! User account repository port

use async_trait::async_trait;
use domain::{SubjectId, UserAccount};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for account persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepositoryPort: Send + Sync {
    /// Load an account
    async fn get(&self, id: SubjectId) -> Result<Option<UserAccount>, ApplicationError>;

    /// Create an account with the given starting balance
    ///
    /// Returns the stored account. Creating an existing account returns it
    /// unchanged.
    async fn create(
        &self,
        id: SubjectId,
        default_balance: u32,
    ) -> Result<UserAccount, ApplicationError>;

    /// Persist the settings and referral stats of an existing account
    ///
    /// The balance is not written; it only changes through
    /// [`Self::add_credits`] and [`Self::decrement_balance_if_positive`].
    async fn update(&self, account: &UserAccount) -> Result<(), ApplicationError>;

    /// Spend one credit if the balance is positive
    ///
    /// Returns `false` when the account is missing or already at zero.
    async fn decrement_balance_if_positive(&self, id: SubjectId)
    -> Result<bool, ApplicationError>;

    /// Add credits; `false` when the account is missing
    async fn add_credits(&self, id: SubjectId, amount: u32) -> Result<bool, ApplicationError>;

    /// Whether the backing database answers
    async fn is_available(&self) -> bool;
}
