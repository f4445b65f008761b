//! Generative providers against a local stand-in for the remote APIs.

mod common;

use axum::http::StatusCode;
use chat_service::config::{GeminiConfig, HuggingFaceConfig};
use chat_service::services::providers::{
    GeminiTextProvider, GenerationParams, HuggingFaceProvider, ProviderError, TextProvider,
};
use chat_service::services::GenerativeFallback;
use common::StubUpstream;
use std::sync::Arc;
use std::time::Duration;

const HF_TOKEN: &str = "hf_test_token";
const GEMINI_KEY: &str = "SECRETKEY123";

fn huggingface(api_base: &str, timeout: Duration) -> HuggingFaceProvider {
    HuggingFaceProvider::new(
        HuggingFaceConfig {
            api_token: Some(HF_TOKEN.to_string()),
            model: "google/flan-t5-base".to_string(),
            api_base: api_base.to_string(),
        },
        timeout,
    )
    .unwrap()
}

fn gemini(api_base: &str) -> GeminiTextProvider {
    GeminiTextProvider::new(
        GeminiConfig {
            api_key: Some(GEMINI_KEY.to_string()),
            model: "gemini-2.0-flash".to_string(),
            api_base: api_base.to_string(),
        },
        Duration::from_secs(5),
    )
    .unwrap()
}

async fn generate(provider: &impl TextProvider) -> Result<String, ProviderError> {
    provider
        .generate("What is malaria?", &GenerationParams::default())
        .await
}

fn fallback_with(provider: impl TextProvider + 'static) -> GenerativeFallback {
    let provider: Arc<dyn TextProvider> = Arc::new(provider);
    GenerativeFallback::new(Some(provider), GenerationParams::default())
}

#[tokio::test]
async fn huggingface_success_sends_bearer_token() {
    let upstream = StubUpstream::spawn(
        StatusCode::OK,
        r#"[{"generated_text": " Malaria is spread by mosquitoes. "}]"#,
    )
    .await;

    let reply = generate(&huggingface(&upstream.base_url, Duration::from_secs(5)))
        .await
        .unwrap();
    assert_eq!(reply, " Malaria is spread by mosquitoes. ");

    let requests = upstream.requests();
    assert_eq!(requests.len(), 1);
    let (uri, headers) = &requests[0];
    assert_eq!(uri.path(), "/models/google/flan-t5-base");
    assert_eq!(headers["authorization"], format!("Bearer {}", HF_TOKEN));
}

#[tokio::test]
async fn huggingface_service_unavailable_is_api_error() {
    let upstream =
        StubUpstream::spawn(StatusCode::SERVICE_UNAVAILABLE, r#"{"error": "Model is loading"}"#)
            .await;

    let err = generate(&huggingface(&upstream.base_url, Duration::from_secs(5)))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::ApiError(_)), "{err}");
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn huggingface_too_many_requests_is_rate_limited() {
    let upstream = StubUpstream::spawn(StatusCode::TOO_MANY_REQUESTS, "{}").await;

    let err = generate(&huggingface(&upstream.base_url, Duration::from_secs(5)))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::RateLimited));
    assert_eq!(err.kind(), "rate_limited");
}

#[tokio::test]
async fn huggingface_unexpected_body_is_malformed() {
    for body in [r#"{"estimated_time": 20.0}"#, "[]", "not json"] {
        let upstream = StubUpstream::spawn(StatusCode::OK, body).await;

        let err = generate(&huggingface(&upstream.base_url, Duration::from_secs(5)))
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::MalformedResponse(_)), "{body}: {err}");
    }
}

#[tokio::test]
async fn huggingface_slow_upstream_times_out() {
    let upstream = StubUpstream::spawn_delayed(
        StatusCode::OK,
        r#"[{"generated_text": "too late"}]"#,
        Duration::from_secs(3),
    )
    .await;

    let err = generate(&huggingface(&upstream.base_url, Duration::from_millis(200)))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::NetworkError(_)), "{err}");
}

#[tokio::test]
async fn unreachable_upstream_is_network_error() {
    let err = generate(&huggingface("http://127.0.0.1:9", Duration::from_secs(1)))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::NetworkError(_)), "{err}");
}

#[tokio::test]
async fn gemini_sends_key_in_header_not_url() {
    let upstream = StubUpstream::spawn(
        StatusCode::OK,
        r#"{"candidates": [{"content": {"parts": [{"text": "Dengue is viral."}]}}]}"#,
    )
    .await;

    assert_eq!(generate(&gemini(&upstream.base_url)).await.unwrap(), "Dengue is viral.");

    let requests = upstream.requests();
    let (uri, headers) = &requests[0];
    assert_eq!(uri.path(), "/models/gemini-2.0-flash:generateContent");
    assert!(!uri.to_string().contains(GEMINI_KEY));
    assert_eq!(headers["x-goog-api-key"], GEMINI_KEY);
}

#[tokio::test]
async fn gemini_error_statuses() {
    let upstream = StubUpstream::spawn(StatusCode::TOO_MANY_REQUESTS, "{}").await;
    assert!(matches!(
        generate(&gemini(&upstream.base_url)).await,
        Err(ProviderError::RateLimited)
    ));

    let upstream = StubUpstream::spawn(StatusCode::SERVICE_UNAVAILABLE, "{}").await;
    assert!(matches!(
        generate(&gemini(&upstream.base_url)).await,
        Err(ProviderError::ApiError(_))
    ));
}

#[tokio::test]
async fn fallback_turns_upstream_failures_into_none() {
    let failures = [
        (StatusCode::SERVICE_UNAVAILABLE, r#"{"error": "Model is loading"}"#),
        (StatusCode::TOO_MANY_REQUESTS, "{}"),
        (StatusCode::OK, r#"{"unexpected": true}"#),
        (StatusCode::OK, r#"[{"generated_text": "   "}]"#),
    ];

    for (status, body) in failures {
        let upstream = StubUpstream::spawn(status, body).await;
        let fallback = fallback_with(huggingface(&upstream.base_url, Duration::from_secs(5)));

        assert_eq!(fallback.generate("What is malaria?").await, None, "{status} {body}");
    }

    let fallback = fallback_with(huggingface("http://127.0.0.1:9", Duration::from_secs(1)));
    assert_eq!(fallback.generate("What is malaria?").await, None);
}

#[tokio::test]
async fn fallback_trims_successful_reply() {
    let upstream = StubUpstream::spawn(
        StatusCode::OK,
        r#"{"generated_text": "  Rest and drink fluids.  "}"#,
    )
    .await;
    let fallback = fallback_with(huggingface(&upstream.base_url, Duration::from_secs(5)));

    assert_eq!(
        fallback.generate("What helps a cold?").await,
        Some("Rest and drink fluids.".to_string())
    );
}
