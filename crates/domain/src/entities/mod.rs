//! Domain entities - Objects with identity and lifecycle

mod reading;
mod user_account;

pub use reading::Reading;
pub use user_account::{ReferralStats, UserAccount, UserSettings};
