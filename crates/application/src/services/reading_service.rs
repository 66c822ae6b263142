//! Card reading service
//!
//! Draws a card from a cached deck list and asks the generation port for an
//! interpretation and advice. Generation is bounded by a timeout at this call
//! site and falls back to fixed texts; successful generations are cached.

use std::{fmt, sync::Arc, time::Duration};

use domain::{DeckType, QuestionText, Reading};
use rand::seq::IndexedRandom;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{GenerationContext, GenerationTopic, TextGenerationPort},
    services::CacheService,
};

/// Cache namespace of generated texts
const GENERATION_NAMESPACE: &str = "reading:";

/// Advice used when generation fails or times out
pub const FALLBACK_ADVICE: &str = "Now is a good time for new beginnings. Trust your inner voice and do not be afraid of change.";

/// Interpretation used when generation fails or times out
#[must_use]
pub fn fallback_interpretation(card: &str) -> String {
    format!(
        "The {card} card points to important changes in your life. Pay attention to the signs around you and trust your intuition."
    )
}

/// Cache key of a deck's card list
#[must_use]
pub fn deck_cache_key(deck: DeckType) -> String {
    format!("tarot_cards:{deck}")
}

/// Timeouts and cache lifetimes for readings
#[derive(Debug, Clone)]
pub struct ReadingSettings {
    /// Deadline for each generation call
    pub generation_timeout: Duration,
    /// Lifetime of cached deck lists
    pub deck_ttl: Duration,
    /// Lifetime of cached generated texts
    pub generation_ttl: Duration,
}

impl Default for ReadingSettings {
    fn default() -> Self {
        Self {
            generation_timeout: Duration::from_secs(30),
            deck_ttl: Duration::from_secs(3600),
            generation_ttl: Duration::from_secs(3600),
        }
    }
}

/// Reading use cases
#[derive(Clone)]
pub struct ReadingService {
    cache: CacheService,
    generator: Arc<dyn TextGenerationPort>,
    settings: ReadingSettings,
}

impl fmt::Debug for ReadingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadingService")
            .field("cache", &self.cache)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ReadingService {
    #[must_use]
    pub fn new(
        cache: CacheService,
        generator: Arc<dyn TextGenerationPort>,
        settings: ReadingSettings,
    ) -> Self {
        Self {
            cache,
            generator,
            settings,
        }
    }

    /// Card list of a deck, read through the cache
    pub async fn deck_cards(&self, deck: DeckType) -> Vec<String> {
        let cards: Vec<String> = self
            .cache
            .get_or_compute(&deck_cache_key(deck), Some(self.settings.deck_ttl), || async {
                deck.cards()
            })
            .await;
        if cards.is_empty() {
            // an empty cached list is as good as a miss
            return deck.cards();
        }
        cards
    }

    /// Draw a random card
    #[instrument(skip(self), level = "debug")]
    pub async fn draw_card(&self, deck: DeckType) -> Result<String, ApplicationError> {
        let cards = self.deck_cards(deck).await;
        cards
            .choose(&mut rand::rng())
            .cloned()
            .ok_or_else(|| ApplicationError::Internal(format!("No cards in deck {deck}")))
    }

    /// Validate the question, draw a card and generate the texts
    #[instrument(skip(self, question), level = "debug")]
    pub async fn create_reading(
        &self,
        deck: DeckType,
        question: &str,
    ) -> Result<Reading, ApplicationError> {
        let question = QuestionText::parse(question)?;
        let card = self.draw_card(deck).await?;
        debug!(%deck, %card, "Card drawn");

        let context = GenerationContext {
            card: card.clone(),
            question: question.as_str().to_string(),
        };
        let (interpretation, advice) = tokio::join!(
            self.generate(GenerationTopic::Interpretation, &context),
            self.generate(GenerationTopic::Advice, &context),
        );

        Ok(Reading::new(deck, card, question, interpretation, advice))
    }

    async fn generate(&self, topic: GenerationTopic, context: &GenerationContext) -> String {
        let result = self
            .cache
            .try_cached(
                GENERATION_NAMESPACE,
                topic.as_str(),
                context,
                Some(self.settings.generation_ttl),
                || self.generate_uncached(topic, context),
            )
            .await;

        result.unwrap_or_else(|e| {
            warn!(%topic, card = %context.card, error = %e, "Generation failed, using fallback text");
            match topic {
                GenerationTopic::Interpretation => fallback_interpretation(&context.card),
                GenerationTopic::Advice => FALLBACK_ADVICE.to_string(),
            }
        })
    }

    async fn generate_uncached(
        &self,
        topic: GenerationTopic,
        context: &GenerationContext,
    ) -> Result<String, ApplicationError> {
        let deadline = self.settings.generation_timeout;
        match timeout(deadline, self.generator.generate(topic, context)).await {
            Ok(Ok(text)) if !text.trim().is_empty() => Ok(text.trim().to_string()),
            Ok(Ok(_)) => Err(ApplicationError::Generation("empty response".to_string())),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ApplicationError::Generation(format!(
                "timed out after {}s",
                deadline.as_secs()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::{
        error::KeyStoreError,
        ports::{MockKeyStorePort, MockTextGenerationPort},
    };

    struct SlowGenerator;

    #[async_trait]
    impl TextGenerationPort for SlowGenerator {
        async fn generate(
            &self,
            _topic: GenerationTopic,
            _context: &GenerationContext,
        ) -> Result<String, ApplicationError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".to_string())
        }

        fn model(&self) -> String {
            "slow".to_string()
        }
    }

    fn offline_cache() -> CacheService {
        let mut store = MockKeyStorePort::new();
        store
            .expect_get()
            .returning(|_| Err(KeyStoreError::Connection("down".to_string())));
        store
            .expect_set()
            .returning(|_, _, _| Err(KeyStoreError::Connection("down".to_string())));
        CacheService::new(Arc::new(store))
    }

    fn service(cache: CacheService, generator: MockTextGenerationPort) -> ReadingService {
        ReadingService::new(
            cache,
            Arc::new(generator),
            ReadingSettings {
                generation_timeout: Duration::from_millis(50),
                ..ReadingSettings::default()
            },
        )
    }

    #[tokio::test]
    async fn deck_list_comes_from_cache_when_present() {
        let mut store = MockKeyStorePort::new();
        store
            .expect_get()
            .withf(|key| key == "tarot_cards:lenormand")
            .returning(|_| Ok(Some(r#"["Ship"]"#.to_string())));
        let readings = service(
            CacheService::new(Arc::new(store)),
            MockTextGenerationPort::new(),
        );

        assert_eq!(readings.deck_cards(DeckType::Lenormand).await, vec!["Ship"]);
        assert_eq!(readings.draw_card(DeckType::Lenormand).await.unwrap(), "Ship");
    }

    #[tokio::test]
    async fn deck_list_is_cached_on_miss() {
        let mut store = MockKeyStorePort::new();
        store.expect_get().returning(|_| Ok(None));
        store
            .expect_set()
            .withf(|key, value, ttl| {
                key == "tarot_cards:rider_waite"
                    && value.starts_with(r#"["The Fool""#)
                    && *ttl == Duration::from_secs(3600)
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        let readings = service(
            CacheService::new(Arc::new(store)),
            MockTextGenerationPort::new(),
        );

        assert_eq!(readings.deck_cards(DeckType::RiderWaite).await.len(), 78);
    }

    #[tokio::test]
    async fn empty_cached_list_falls_back_to_deck() {
        let mut store = MockKeyStorePort::new();
        store.expect_get().returning(|_| Ok(Some("[]".to_string())));
        let readings = service(
            CacheService::new(Arc::new(store)),
            MockTextGenerationPort::new(),
        );

        assert_eq!(readings.deck_cards(DeckType::Lenormand).await.len(), 36);
    }

    #[tokio::test]
    async fn reading_uses_generated_texts() {
        let mut generator = MockTextGenerationPort::new();
        generator
            .expect_generate()
            .withf(|topic, _| *topic == GenerationTopic::Interpretation)
            .returning(|_, ctx| Ok(format!("  meaning of {}  ", ctx.card)));
        generator
            .expect_generate()
            .withf(|topic, _| *topic == GenerationTopic::Advice)
            .returning(|_, _| Ok("rest".to_string()));

        let reading = service(offline_cache(), generator)
            .create_reading(DeckType::Lenormand, "  Where to go?  ")
            .await
            .unwrap();

        assert_eq!(reading.question.as_str(), "Where to go?");
        assert_eq!(reading.interpretation, format!("meaning of {}", reading.card));
        assert_eq!(reading.advice, "rest");
        assert!(DeckType::Lenormand.cards().contains(&reading.card));
    }

    #[tokio::test]
    async fn generation_errors_fall_back() {
        let mut generator = MockTextGenerationPort::new();
        generator
            .expect_generate()
            .returning(|_, _| Err(ApplicationError::Generation("503".to_string())));

        let reading = service(offline_cache(), generator)
            .create_reading(DeckType::RiderWaite, "Love?")
            .await
            .unwrap();

        assert_eq!(reading.interpretation, fallback_interpretation(&reading.card));
        assert_eq!(reading.advice, FALLBACK_ADVICE);
    }

    #[tokio::test]
    async fn empty_generation_falls_back() {
        let mut generator = MockTextGenerationPort::new();
        generator
            .expect_generate()
            .returning(|_, _| Ok("   ".to_string()));

        let reading = service(offline_cache(), generator)
            .create_reading(DeckType::RiderWaite, "Money?")
            .await
            .unwrap();

        assert_eq!(reading.advice, FALLBACK_ADVICE);
    }

    #[tokio::test]
    async fn invalid_question_is_rejected_before_generation() {
        let mut generator = MockTextGenerationPort::new();
        generator.expect_generate().never();

        let result = service(offline_cache(), generator)
            .create_reading(DeckType::RiderWaite, "<script>alert(1)</script>")
            .await;

        assert!(matches!(result, Err(ApplicationError::Domain(_))));
    }

    #[tokio::test]
    async fn failed_generation_is_not_cached() {
        let mut store = MockKeyStorePort::new();
        store.expect_get().returning(|_| Ok(None));
        // only the deck list is written
        store
            .expect_set()
            .withf(|key, _, _| key.starts_with("tarot_cards:"))
            .times(1)
            .returning(|_, _, _| Ok(()));
        let mut generator = MockTextGenerationPort::new();
        generator
            .expect_generate()
            .returning(|_, _| Err(ApplicationError::Generation("down".to_string())));

        let result = service(CacheService::new(Arc::new(store)), generator)
            .create_reading(DeckType::Lenormand, "Career?")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn slow_generation_times_out_to_fallback() {
        let readings = ReadingService::new(
            offline_cache(),
            Arc::new(SlowGenerator),
            ReadingSettings {
                generation_timeout: Duration::from_millis(20),
                ..ReadingSettings::default()
            },
        );

        let reading = readings
            .create_reading(DeckType::Lenormand, "Soon?")
            .await
            .unwrap();
        assert_eq!(reading.advice, FALLBACK_ADVICE);
        assert_eq!(reading.interpretation, fallback_interpretation(&reading.card));
    }

    #[test]
    fn fallback_interpretation_names_card() {
        assert!(fallback_interpretation("The Star").contains("The Star"));
    }
}
