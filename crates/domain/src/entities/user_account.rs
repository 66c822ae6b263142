//! User account entity
//!
//! An account holds the subject's message credits, their reading preferences
//! and the referral bookkeeping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{DeckType, SubjectId};

/// Reading preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Deck readings are drawn from
    pub deck: DeckType,
    /// Whether the daily tip is sent
    pub daily_tip_enabled: bool,
    /// Local time of the daily tip, `HH:MM`
    pub daily_tip_time: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            deck: DeckType::default(),
            daily_tip_enabled: false,
            daily_tip_time: "18:00".to_string(),
        }
    }
}

/// Referral bookkeeping for a referrer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralStats {
    /// Every account this subject has referred
    pub total: u32,
    /// Referred accounts still counted as active
    pub active: u32,
    /// Referred subjects, oldest first
    pub referred: Vec<SubjectId>,
}

/// A subject's account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    id: SubjectId,
    balance: u32,
    settings: UserSettings,
    referrals: ReferralStats,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserAccount {
    /// Create a fresh account with the given starting balance
    #[must_use]
    pub fn new(id: SubjectId, default_balance: u32) -> Self {
        let now = Utc::now();
        Self {
            id,
            balance: default_balance,
            settings: UserSettings::default(),
            referrals: ReferralStats::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Restore an account from storage
    #[must_use]
    pub const fn restore(
        id: SubjectId,
        balance: u32,
        settings: UserSettings,
        referrals: ReferralStats,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            balance,
            settings,
            referrals,
            created_at,
            updated_at,
        }
    }

    #[must_use]
    pub const fn id(&self) -> SubjectId {
        self.id
    }

    /// Remaining message credits
    #[must_use]
    pub const fn balance(&self) -> u32 {
        self.balance
    }

    #[must_use]
    pub const fn settings(&self) -> &UserSettings {
        &self.settings
    }

    #[must_use]
    pub const fn referrals(&self) -> &ReferralStats {
        &self.referrals
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether at least one credit is left
    #[must_use]
    pub const fn has_credits(&self) -> bool {
        self.balance > 0
    }

    /// Add credits, saturating at `u32::MAX`
    pub fn credit(&mut self, amount: u32) {
        self.balance = self.balance.saturating_add(amount);
        self.updated_at = Utc::now();
    }

    /// Spend one credit; returns `false` when the balance was already zero
    pub fn debit(&mut self) -> bool {
        if self.balance == 0 {
            return false;
        }
        self.balance -= 1;
        self.updated_at = Utc::now();
        true
    }

    /// Record that `referred` joined through this account
    ///
    /// Returns `false` if the subject was already recorded.
    pub fn record_referral(&mut self, referred: SubjectId) -> bool {
        if self.referrals.referred.contains(&referred) {
            return false;
        }
        self.referrals.total = self.referrals.total.saturating_add(1);
        self.referrals.active = self.referrals.active.saturating_add(1);
        self.referrals.referred.push(referred);
        self.updated_at = Utc::now();
        true
    }

    /// Replace the reading preferences
    pub fn update_settings(&mut self, settings: UserSettings) {
        self.settings = settings;
        self.updated_at = Utc::now();
    }
}
