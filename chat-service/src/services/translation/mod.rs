//! Translation between the user's language and English.
//!
//! The pipeline only ever translates into English (source auto-detected) or
//! out of English, and treats every failure as "keep the text as it was".

pub mod google;
pub mod mock;

pub use google::GoogleTranslator;
pub use mock::MockTranslator;

use async_trait::async_trait;
use thiserror::Error;

/// Source code asking the backend to detect the input language.
pub const AUTO_DETECT: &str = "auto";

#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("Translation disabled")]
    Disabled,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Unexpected response shape: {0}")]
    MalformedResponse(String),
}

#[async_trait]
pub trait Translator: Send + Sync {
    fn name(&self) -> &'static str;

    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslationError>;
}

/// Used when translation is switched off in configuration.
pub struct DisabledTranslator;

#[async_trait]
impl Translator for DisabledTranslator {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn translate(
        &self,
        _text: &str,
        _source: &str,
        _target: &str,
    ) -> Result<String, TranslationError> {
        Err(TranslationError::Disabled)
    }
}
