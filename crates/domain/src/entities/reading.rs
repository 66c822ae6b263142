//! Card reading entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{DeckType, QuestionText};

/// A single-card reading answered for a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// Deck the card was drawn from
    pub deck: DeckType,
    /// Drawn card
    pub card: String,
    /// Sanitised question
    pub question: QuestionText,
    /// Meaning of the card for the question
    pub interpretation: String,
    /// Practical advice
    pub advice: String,
    /// Credits left after this reading
    pub remaining_messages: u32,
    pub created_at: DateTime<Utc>,
}

impl Reading {
    /// Assemble a reading drawn now
    #[must_use]
    pub fn new(
        deck: DeckType,
        card: impl Into<String>,
        question: QuestionText,
        interpretation: impl Into<String>,
        advice: impl Into<String>,
    ) -> Self {
        Self {
            deck,
            card: card.into(),
            question,
            interpretation: interpretation.into(),
            advice: advice.into(),
            remaining_messages: 0,
            created_at: Utc::now(),
        }
    }

    /// Set the credits left after this reading
    #[must_use]
    pub fn with_remaining(mut self, remaining: u32) -> Self {
        self.remaining_messages = remaining;
        self
    }
}
