use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Language code the pipeline works in.
pub const DEFAULT_LANG: &str = "en";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(max = 4000, message = "Message must be at most 4000 characters"))]
    pub message: String,
    #[validate(length(max = 16, message = "Language code must be at most 16 characters"))]
    #[serde(default = "default_lang")]
    pub lang: String,
}

fn default_lang() -> String {
    DEFAULT_LANG.to_string()
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            lang: lang.into(),
        }
    }

    /// The requested language, or `None` when the pipeline can stay in English.
    pub fn target_lang(&self) -> Option<&str> {
        let lang = self.lang.trim();
        if lang.is_empty() || lang.eq_ignore_ascii_case(DEFAULT_LANG) {
            None
        } else {
            Some(lang)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    pub reply: String,
    pub source: ReplySource,
}

/// Which pipeline stage produced the reply.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    Rule,
    Generative,
    Fallback,
}

impl ReplySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplySource::Rule => "rule",
            ReplySource::Generative => "generative",
            ReplySource::Fallback => "fallback",
        }
    }
}

impl fmt::Display for ReplySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
