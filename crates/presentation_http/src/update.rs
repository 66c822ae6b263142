//! Inbound bot updates
//!
//! The subset of the Telegram Bot API `Update` object this service reacts
//! to. Unknown fields are ignored.

use domain::RateLimitAction;
use serde::{Deserialize, Serialize};

/// Account that sent a message or pressed a button
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sender {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

/// Chat a message was posted in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Incoming message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<Sender>,
    #[serde(default)]
    pub chat: Option<Chat>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Inline keyboard button press
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: Sender,
    #[serde(default)]
    pub data: Option<String>,
}

/// Webhook payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

impl Update {
    /// Raw id of whoever caused the update
    pub fn sender_id(&self) -> Option<i64> {
        if let Some(callback) = &self.callback_query {
            return Some(callback.from.id);
        }
        self.message
            .as_ref()
            .and_then(|m| m.from.as_ref())
            .map(|from| from.id)
    }

    /// Chat to answer in; private chats share the sender's id
    pub fn chat_id(&self) -> Option<i64> {
        if let Some(callback) = &self.callback_query {
            return Some(callback.from.id);
        }
        let message = self.message.as_ref()?;
        message
            .chat
            .as_ref()
            .map(|c| c.id)
            .or_else(|| message.from.as_ref().map(|f| f.id))
    }

    /// Rate-limit bucket of this update
    pub fn action(&self) -> Option<RateLimitAction> {
        if self.callback_query.is_some() {
            return Some(RateLimitAction::Callback);
        }
        self.message
            .as_ref()
            .map(|m| RateLimitAction::classify_text(m.text.as_deref()))
    }
}
