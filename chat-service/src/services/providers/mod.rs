//! Text-generation provider abstractions and implementations.
//!
//! Providers answer messages the rule table does not cover. Each backend
//! (Hugging Face Inference API, Gemini, mock) implements [`TextProvider`] and
//! reports failures as [`ProviderError`]; turning those into "no answer" is
//! the job of [`crate::services::GenerativeFallback`].

pub mod gemini;
pub mod huggingface;
pub mod mock;

pub use gemini::GeminiTextProvider;
pub use huggingface::HuggingFaceProvider;
pub use mock::MockTextProvider;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Unexpected response shape: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::ContentFiltered => "content_filtered",
            ProviderError::NetworkError(_) => "network_error",
            ProviderError::MalformedResponse(_) => "malformed_response",
        }
    }
}

/// Generation parameters for provider requests.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 200,
            temperature: 0.3,
        }
    }
}

/// Trait for text generation providers (e.g., Hugging Face, Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Provider name for logs and metrics.
    fn name(&self) -> &'static str;

    /// Whether a credential is present.
    fn is_configured(&self) -> bool;

    /// Generate a reply to `prompt`.
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, ProviderError>;
}

/// Maps a non-success HTTP status to the matching error.
pub(crate) fn status_error(
    provider: &str,
    status: reqwest::StatusCode,
    body: &str,
) -> ProviderError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return ProviderError::RateLimited;
    }

    ProviderError::ApiError(format!("{} API error {}: {}", provider, status, body))
}

/// Transport failure, with the request URL stripped from the message.
pub(crate) fn network_error(err: reqwest::Error) -> ProviderError {
    let err = err.without_url();
    if err.is_timeout() {
        ProviderError::NetworkError(format!("request timed out: {}", err))
    } else {
        ProviderError::NetworkError(err.to_string())
    }
}
