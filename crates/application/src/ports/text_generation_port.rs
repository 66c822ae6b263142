//! Text generation port
//!
//! Opaque `generate(topic, context)` capability used for reading texts.

use std::fmt;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// What kind of text is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationTopic {
    /// Meaning of a card for a question
    Interpretation,
    /// Practical advice derived from a card
    Advice,
}

impl GenerationTopic {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Interpretation => "interpretation",
            Self::Advice => "advice",
        }
    }
}

impl fmt::Display for GenerationTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input a generation is conditioned on
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerationContext {
    /// Drawn card
    pub card: String,
    /// Sanitised question
    pub question: String,
}

/// Port for text generation
///
/// Implementations make a single attempt; the call site applies the timeout
/// and the fallback text.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TextGenerationPort: Send + Sync {
    async fn generate(
        &self,
        topic: GenerationTopic,
        context: &GenerationContext,
    ) -> Result<String, ApplicationError>;

    /// Model identifier, for logs
    fn model(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn TextGenerationPort) {}

    #[test]
    fn topic_names() {
        assert_eq!(GenerationTopic::Advice.to_string(), "advice");
        assert_eq!(GenerationTopic::Interpretation.as_str(), "interpretation");
    }
}
