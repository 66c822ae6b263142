//! Rate-limit action buckets

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Named category of inbound work, each with its own rate-limit policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitAction {
    /// Conversational message (high frequency)
    Message,
    /// Interactive button callback
    Callback,
    /// Session start command (strict)
    Start,
}

impl RateLimitAction {
    /// Every predefined action
    pub const ALL: [Self; 3] = [Self::Message, Self::Callback, Self::Start];

    /// Name used in storage keys and configuration
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Callback => "callback",
            Self::Start => "start",
        }
    }

    /// Classify a text message into an action bucket
    ///
    /// Commands starting with `/start` open a session, everything else,
    /// including other commands, counts as a conversational message.
    #[must_use]
    pub fn classify_text(text: Option<&str>) -> Self {
        match text {
            Some(t) if t.starts_with("/start") => Self::Start,
            _ => Self::Message,
        }
    }
}

impl fmt::Display for RateLimitAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RateLimitAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "message" => Ok(Self::Message),
            "callback" => Ok(Self::Callback),
            "start" => Ok(Self::Start),
            other => Err(DomainError::UnknownAction(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_str_round_trips_through_from_str() {
        for action in RateLimitAction::ALL {
            assert_eq!(action.as_str().parse::<RateLimitAction>().unwrap(), action);
        }
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!(
            "CALLBACK".parse::<RateLimitAction>().unwrap(),
            RateLimitAction::Callback
        );
    }

    #[test]
    fn unknown_action_is_rejected() {
        assert_eq!(
            "upload".parse::<RateLimitAction>(),
            Err(DomainError::UnknownAction("upload".to_string()))
        );
    }

    #[test]
    fn classify_start_command() {
        assert_eq!(
            RateLimitAction::classify_text(Some("/start")),
            RateLimitAction::Start
        );
        assert_eq!(
            RateLimitAction::classify_text(Some("/start friend_42")),
            RateLimitAction::Start
        );
    }

    #[test]
    fn classify_other_commands_and_text_as_message() {
        assert_eq!(
            RateLimitAction::classify_text(Some("/help")),
            RateLimitAction::Message
        );
        assert_eq!(
            RateLimitAction::classify_text(Some("Will it rain?")),
            RateLimitAction::Message
        );
        assert_eq!(
            RateLimitAction::classify_text(None),
            RateLimitAction::Message
        );
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(
            serde_json::to_string(&RateLimitAction::Start).unwrap(),
            "\"start\""
        );
    }
}
