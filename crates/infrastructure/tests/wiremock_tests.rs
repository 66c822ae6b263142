//! Generation adapter tests against a mocked completions endpoint

use std::{sync::Arc, time::Duration};

use application::{
    CacheService, FALLBACK_ADVICE, ReadingService, ReadingSettings, fallback_interpretation,
    ports::{GenerationContext, GenerationTopic, ManualClock, TextGenerationPort},
};
use domain::DeckType;
use infrastructure::{GenerationConfig, MemoryKeyStore, OpenAiGenerationAdapter};
use secrecy::SecretString;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

fn config(server: &MockServer) -> GenerationConfig {
    GenerationConfig {
        base_url: format!("{}/v1", server.uri()),
        api_key: Some(SecretString::from("test-key".to_string())),
        model: "test-model".to_string(),
        ..GenerationConfig::default()
    }
}

fn context() -> GenerationContext {
    GenerationContext {
        card: "The Moon".to_string(),
        question: "What should I expect?".to_string(),
    }
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn sends_chat_request_and_returns_trimmed_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({ "model": "test-model", "max_tokens": 500 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("  Hidden things surface.  ")))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = OpenAiGenerationAdapter::new(&config(&server)).unwrap();
    let text = adapter
        .generate(GenerationTopic::Interpretation, &context())
        .await
        .unwrap();

    assert_eq!(text, "Hidden things surface.");
}

#[tokio::test]
async fn server_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let adapter = OpenAiGenerationAdapter::new(&config(&server)).unwrap();
    let err = adapter
        .generate(GenerationTopic::Advice, &context())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn empty_choices_are_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let adapter = OpenAiGenerationAdapter::new(&config(&server)).unwrap();
    assert!(
        adapter
            .generate(GenerationTopic::Advice, &context())
            .await
            .is_err()
    );
}

#[tokio::test]
async fn malformed_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let adapter = OpenAiGenerationAdapter::new(&config(&server)).unwrap();
    assert!(
        adapter
            .generate(GenerationTopic::Interpretation, &context())
            .await
            .is_err()
    );
}

fn reading_service(server: &MockServer, timeout: Duration) -> ReadingService {
    let clock = Arc::new(ManualClock::new(0));
    let cache = CacheService::new(Arc::new(MemoryKeyStore::new("test:", clock)));
    let adapter = OpenAiGenerationAdapter::new(&config(server)).unwrap();
    ReadingService::new(
        cache,
        Arc::new(adapter),
        ReadingSettings {
            generation_timeout: timeout,
            ..ReadingSettings::default()
        },
    )
}

#[tokio::test]
async fn slow_endpoint_falls_back_at_call_site_deadline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("too late"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let readings = reading_service(&server, Duration::from_millis(200));
    let reading = readings
        .create_reading(DeckType::Lenormand, "Will I travel?")
        .await
        .unwrap();

    assert_eq!(reading.advice, FALLBACK_ADVICE);
    assert_eq!(reading.interpretation, fallback_interpretation(&reading.card));
}

#[tokio::test]
async fn generated_texts_are_cached() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Steady progress.")))
        .mount(&server)
        .await;

    let readings = reading_service(&server, Duration::from_secs(5));
    for _ in 0..100 {
        let reading = readings
            .create_reading(DeckType::Lenormand, "Career?")
            .await
            .unwrap();
        assert_eq!(reading.advice, "Steady progress.");
    }

    // at most one request per card and topic
    let requests = server.received_requests().await.unwrap_or_default().len();
    assert!(requests <= 2 * DeckType::Lenormand.cards().len());
    assert!(requests >= 2);
}
