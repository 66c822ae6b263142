//! Account defaults.

use serde::{Deserialize, Serialize};

/// Credit and referral settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Credits granted to a new account
    #[serde(default = "default_credits")]
    pub default_balance: u32,

    /// Credits granted to both sides of a referral
    #[serde(default = "default_credits")]
    pub referral_bonus: u32,

    /// Bot handle used in referral links
    #[serde(default = "default_bot_username")]
    pub bot_username: String,
}

const fn default_credits() -> u32 {
    10
}

fn default_bot_username() -> String {
    "arcana_bot".to_string()
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            default_balance: default_credits(),
            referral_bonus: default_credits(),
            bot_username: default_bot_username(),
        }
    }
}
