//! Webhook replies
//!
//! Telegram accepts a Bot API method call as the body of a webhook
//! response, so every reply is a `sendMessage` call.

use serde::{Deserialize, Serialize};

/// One inline keyboard button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl InlineButton {
    #[must_use]
    pub fn callback(text: &str, data: &str) -> Self {
        Self {
            text: text.to_string(),
            callback_data: Some(data.to_string()),
            url: None,
        }
    }

    #[must_use]
    pub fn link(text: &str, url: &str) -> Self {
        Self {
            text: text.to_string(),
            callback_data: None,
            url: Some(url.to_string()),
        }
    }
}

/// Inline keyboard, one button per row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboard {
    pub inline_keyboard: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    #[must_use]
    pub fn column(buttons: Vec<InlineButton>) -> Self {
        Self {
            inline_keyboard: buttons.into_iter().map(|b| vec![b]).collect(),
        }
    }
}

/// `sendMessage` call returned as the webhook response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotReply {
    pub method: String,
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboard>,
}

impl BotReply {
    #[must_use]
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            method: "sendMessage".to_string(),
            chat_id,
            text: text.into(),
            reply_markup: None,
        }
    }

    #[must_use]
    pub fn with_keyboard(mut self, keyboard: InlineKeyboard) -> Self {
        self.reply_markup = Some(keyboard);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_send_message() {
        let reply = BotReply::text(42, "hi").with_keyboard(InlineKeyboard::column(vec![
            InlineButton::callback("Back", "back_to_menu"),
        ]));
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["method"], "sendMessage");
        assert_eq!(json["chat_id"], 42);
        assert_eq!(
            json["reply_markup"]["inline_keyboard"][0][0]["callback_data"],
            "back_to_menu"
        );
        assert!(json["reply_markup"]["inline_keyboard"][0][0].get("url").is_none());
    }

    #[test]
    fn plain_text_omits_markup() {
        let json = serde_json::to_value(BotReply::text(1, "x")).unwrap();
        assert!(json.get("reply_markup").is_none());
    }
}
