//! Bot texts and keyboards

use domain::Reading;

use crate::reply::{InlineButton, InlineKeyboard};

pub const BUY_MESSAGES: &str = "💎 Buy messages";
pub const INVITE_FRIEND: &str = "🎁 Invite a friend";
pub const BACK: &str = "⬅️ Back";

pub const CALLBACK_BUY_MESSAGES: &str = "buy_messages";
pub const CALLBACK_INVITE_FRIEND: &str = "invite_friend";
pub const CALLBACK_BACK_TO_MENU: &str = "back_to_menu";

pub const RATE_LIMIT_EXCEEDED: &str =
    "⏳ You are sending requests too quickly. Please slow down and try again in a few minutes.";

pub const NO_MESSAGES: &str = "😔 You have run out of messages.\n\nBuy more messages or invite a friend to receive free ones.";

pub const BUY_MESSAGES_TEXT: &str =
    "💎 Message packs will be available soon. Meanwhile, invite friends to earn free messages.";

pub const ERROR_OCCURRED: &str = "⚠️ Something went wrong. Please try again later.";

pub const TEXT_ONLY: &str = "✍️ Please send your question as a text message.";

pub const UNKNOWN_ACTION: &str = "🤔 This button is no longer available.";

pub fn welcome(balance: u32) -> String {
    format!(
        "🔮 Welcome to Arcana!\n\nAsk any question and I will draw a card for you.\n\nYour balance: {balance} messages"
    )
}

pub fn referral_bonus(bonus: u32) -> String {
    format!("🎁 You joined through a friend's link and received {bonus} bonus messages!")
}

pub fn main_menu(balance: u32) -> String {
    format!("🏠 Main menu\n\nYour balance: {balance} messages")
}

pub fn invite(link: &str, bonus: u32) -> String {
    format!(
        "🎁 Share this link with a friend. You both receive {bonus} messages when they join:\n\n{link}"
    )
}

pub fn invalid_question(reason: &str) -> String {
    format!("❌ I cannot read this question: {reason}\n\nPlease rephrase it.")
}

pub fn reading(reading: &Reading) -> String {
    format!(
        "🔮 Your question: {}\n\n🃏 Card: {}\n\n📖 Interpretation:\n{}\n\n💡 Advice:\n{}\n\n✉️ Messages left: {}",
        reading.question,
        reading.card,
        reading.interpretation,
        reading.advice,
        reading.remaining_messages
    )
}

pub fn main_menu_keyboard() -> InlineKeyboard {
    InlineKeyboard::column(vec![
        InlineButton::callback(BUY_MESSAGES, CALLBACK_BUY_MESSAGES),
        InlineButton::callback(INVITE_FRIEND, CALLBACK_INVITE_FRIEND),
    ])
}

pub fn buy_messages_keyboard() -> InlineKeyboard {
    InlineKeyboard::column(vec![
        InlineButton::callback(INVITE_FRIEND, CALLBACK_INVITE_FRIEND),
        InlineButton::callback(BACK, CALLBACK_BACK_TO_MENU),
    ])
}

pub fn invite_keyboard(link: &str) -> InlineKeyboard {
    InlineKeyboard::column(vec![
        InlineButton::link("📤 Share link", &format!("https://t.me/share/url?url={link}")),
        InlineButton::callback(BACK, CALLBACK_BACK_TO_MENU),
    ])
}
