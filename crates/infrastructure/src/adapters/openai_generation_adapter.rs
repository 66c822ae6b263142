//! OpenAI-compatible text generation adapter
//!
//! Implements `TextGenerationPort` against a `/chat/completions` endpoint.
//! The adapter makes one attempt per call; the reading service applies the
//! deadline and substitutes fallback texts on error.

use std::time::Duration;

use application::{
    error::ApplicationError,
    ports::{GenerationContext, GenerationTopic, TextGenerationPort},
};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::{config::GenerationConfig, error::InfrastructureError};

const INTERPRETATION_SYSTEM_PROMPT: &str = "You are an experienced tarot reader with deep knowledge of the cards. Give an accurate and helpful interpretation of the card in the context of the client's question. Be wise and supportive.";

const ADVICE_SYSTEM_PROMPT: &str = "You are a wise counsellor who helps people make good decisions. Based on the drawn card and the client's question, give practical advice. Be specific and supportive.";

/// System prompt for a topic
#[must_use]
pub const fn system_prompt(topic: GenerationTopic) -> &'static str {
    match topic {
        GenerationTopic::Interpretation => INTERPRETATION_SYSTEM_PROMPT,
        GenerationTopic::Advice => ADVICE_SYSTEM_PROMPT,
    }
}

/// User prompt for a topic and context
#[must_use]
pub fn user_prompt(topic: GenerationTopic, context: &GenerationContext) -> String {
    let card = &context.card;
    let question = &context.question;
    match topic {
        GenerationTopic::Interpretation => format!(
            "Card: {card}\nClient's question: {question}\n\nGive a detailed interpretation of {card} in the context of the question. Explain what the card means for this situation, which energies it carries and how it can help resolve the question."
        ),
        GenerationTopic::Advice => format!(
            "Card: {card}\nClient's question: {question}\n\nBased on {card} and the question, give practical advice. What should be done, how to act, what deserves attention. Be specific and useful."
        ),
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Adapter for OpenAI-compatible chat completion APIs
#[derive(Debug)]
pub struct OpenAiGenerationAdapter {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiGenerationAdapter {
    /// Build the adapter and its HTTP client
    ///
    /// The client timeout is a little longer than the call-site deadline so
    /// that the deadline is what normally fires.
    pub fn new(config: &GenerationConfig) -> Result<Self, InfrastructureError> {
        let client = Client::builder()
            .timeout(config.timeout() + Duration::from_secs(5))
            .build()
            .map_err(|e| InfrastructureError::HttpClient(e.to_string()))?;

        if config.api_key.is_none() {
            warn!("No generation API key configured, readings will use fallback texts");
        }
        info!(
            base_url = %config.base_url,
            model = %config.model,
            "Initialized text generation adapter"
        );

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl TextGenerationPort for OpenAiGenerationAdapter {
    #[instrument(skip(self, context), fields(model = %self.model, card = %context.card))]
    async fn generate(
        &self,
        topic: GenerationTopic,
        context: &GenerationContext,
    ) -> Result<String, ApplicationError> {
        let Some(api_key) = &self.api_key else {
            return Err(ApplicationError::Generation(
                "no API key configured".to_string(),
            ));
        };

        let prompt = user_prompt(topic, context);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt(topic),
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        debug!("Sending chat completion request");
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| ApplicationError::Generation(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApplicationError::Generation(format!(
                "API returned {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ApplicationError::Generation(format!("invalid response: {e}")))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ApplicationError::Generation("empty completion".to_string()));
        }
        Ok(text)
    }

    fn model(&self) -> String {
        self.model.clone()
    }
}
