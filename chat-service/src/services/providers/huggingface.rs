//! Hugging Face Inference API provider.
//!
//! Text-to-text and text-generation pipelines answer in several shapes
//! depending on the model; all of them are accepted here.

use super::{network_error, status_error, GenerationParams, ProviderError, TextProvider};
use crate::config::HuggingFaceConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hugging Face Inference API provider.
pub struct HuggingFaceProvider {
    config: HuggingFaceConfig,
    client: Client,
}

impl HuggingFaceProvider {
    pub fn new(config: HuggingFaceConfig, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn api_url(&self) -> String {
        format!(
            "{}/models/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }

    fn token(&self) -> Option<&str> {
        self.config
            .api_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
    }
}

#[async_trait]
impl TextProvider for HuggingFaceProvider {
    fn name(&self) -> &'static str {
        "huggingface"
    }

    fn is_configured(&self) -> bool {
        self.token().is_some()
    }

    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        let token = self.token().ok_or_else(|| {
            ProviderError::NotConfigured("HF_API_TOKEN not set".to_string())
        })?;

        let request = InferenceRequest {
            inputs: prompt,
            parameters: InferenceParameters {
                max_new_tokens: params.max_new_tokens,
                temperature: params.temperature,
                do_sample: false,
            },
        };

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending request to Hugging Face Inference API"
        );

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(status_error("Hugging Face", status, &error_text));
        }

        let body: InferenceResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        body.into_text().ok_or_else(|| {
            ProviderError::MalformedResponse("no generated text in response".to_string())
        })
    }
}

// ============================================================================
// Inference API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    temperature: f32,
    do_sample: bool,
}

/// Accepted reply encodings, tried in order.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    /// `[{"generated_text": "..."}]` or `["..."]`
    List(Vec<InferenceItem>),
    /// `{"generated_text": "..."}`
    Object(GeneratedText),
    /// `"..."`
    Plain(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceItem {
    Object(GeneratedText),
    Plain(String),
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    #[serde(alias = "summary_text", alias = "translation_text")]
    generated_text: String,
}

impl InferenceResponse {
    fn into_text(self) -> Option<String> {
        match self {
            InferenceResponse::List(items) => {
                items.into_iter().next().map(|item| match item {
                    InferenceItem::Object(obj) => obj.generated_text,
                    InferenceItem::Plain(text) => text,
                })
            }
            InferenceResponse::Object(obj) => Some(obj.generated_text),
            InferenceResponse::Plain(text) => Some(text),
        }
    }
}
