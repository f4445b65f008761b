//! Google Translate client using the public `client=gtx` endpoint.
//!
//! The endpoint answers with nested arrays rather than an object:
//! `[[["Hola", "Hello", null, null, 10], ...], null, "en", ...]`. The first
//! element lists sentence segments whose first entry is the translation.

use super::{TranslationError, Translator};
use crate::config::TranslationConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

pub struct GoogleTranslator {
    endpoint: String,
    client: Client,
}

impl GoogleTranslator {
    pub fn new(config: &TranslationConfig) -> Result<Self, TranslationError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| TranslationError::NetworkError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            client,
        })
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslationError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        tracing::debug!(source, target, text_len = text.len(), "Requesting translation");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("dt", "t"),
                ("sl", source),
                ("tl", target),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| TranslationError::NetworkError(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(TranslationError::ApiError(format!(
                "Translate API error {}: {}",
                status, error_text
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TranslationError::MalformedResponse(e.to_string()))?;

        extract_translation(&body)
    }
}

fn extract_translation(body: &Value) -> Result<String, TranslationError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslationError::MalformedResponse("missing segment list".to_string()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.trim().is_empty() {
        return Err(TranslationError::MalformedResponse(
            "no translated text in response".to_string(),
        ));
    }

    Ok(translated)
}
