//! Chat pipeline: translate in, rules, generative fallback, translate out,
//! disclaimer.
//!
//! Every stage degrades to the previous best text on failure, so a request
//! always produces a reply.

use crate::models::{ChatRequest, ChatResponse, ReplySource, DEFAULT_LANG};
use crate::services::generator::GenerativeFallback;
use crate::services::metrics;
use crate::services::rules::RuleMatcher;
use crate::services::translation::{Translator, AUTO_DETECT};
use std::sync::Arc;

/// Reply used when neither the rules nor the generative backend answer.
pub const DEFAULT_REPLY: &str = "I can help with symptoms, vaccines, and interpreting uploaded images. \
Could you give more detail or upload an image? This is not medical advice.";

/// Appended to every reply.
pub const DISCLAIMER: &str =
    "\n\n⚠️ This is not a medical diagnosis. For personal medical advice, consult a licensed clinician.";

/// Characters of the English reply included in the per-chat log line.
const LOG_REPLY_CHARS: usize = 200;

#[derive(Clone)]
pub struct ChatOrchestrator {
    rules: &'static RuleMatcher,
    translator: Arc<dyn Translator>,
    generator: GenerativeFallback,
}

impl ChatOrchestrator {
    pub fn new(translator: Arc<dyn Translator>, generator: GenerativeFallback) -> Self {
        Self {
            rules: RuleMatcher::shared(),
            translator,
            generator,
        }
    }

    pub fn generator(&self) -> &GenerativeFallback {
        &self.generator
    }

    #[tracing::instrument(skip(self, request), fields(lang = %request.lang))]
    pub async fn respond(&self, request: &ChatRequest) -> ChatResponse {
        let target_lang = request.target_lang();

        let text_en = match target_lang {
            Some(_) => self
                .translate(&request.message, AUTO_DETECT, DEFAULT_LANG, "inbound")
                .await
                .unwrap_or_else(|| request.message.clone()),
            None => request.message.clone(),
        };

        let (reply_en, source) = self.answer(&text_en).await;

        let reply_out = match target_lang {
            Some(lang) => self
                .translate(&reply_en, DEFAULT_LANG, lang, "outbound")
                .await
                .unwrap_or_else(|| reply_en.clone()),
            None => reply_en.clone(),
        };

        let reply = append_disclaimer(&reply_out);

        metrics::record_reply(source.as_str());
        tracing::info!(
            source = %source,
            input = %text_en,
            reply = %truncate(&reply_en, LOG_REPLY_CHARS),
            "CHAT"
        );

        ChatResponse { reply, source }
    }

    /// English reply and its provenance.
    async fn answer(&self, text_en: &str) -> (String, ReplySource) {
        if let Some(rule) = self.rules.find(text_en) {
            tracing::debug!(category = rule.category(), "Rule matched");
            return (rule.reply().to_string(), ReplySource::Rule);
        }

        match self.generator.generate(text_en).await {
            Some(reply) => (reply, ReplySource::Generative),
            None => (DEFAULT_REPLY.to_string(), ReplySource::Fallback),
        }
    }

    /// `None` when the translator fails or returns nothing usable.
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
        direction: &'static str,
    ) -> Option<String> {
        match self.translator.translate(text, source, target).await {
            Ok(translated) if !translated.trim().is_empty() => Some(translated),
            Ok(_) => {
                tracing::warn!(direction, target, "Translation returned empty text");
                metrics::record_translation_failure(direction);
                None
            }
            Err(e) => {
                tracing::warn!(
                    direction,
                    target,
                    translator = self.translator.name(),
                    error = %e,
                    "Translation failed, keeping original text"
                );
                metrics::record_translation_failure(direction);
                None
            }
        }
    }
}

/// Appends [`DISCLAIMER`] unless the reply already carries it.
pub fn append_disclaimer(reply: &str) -> String {
    if reply.contains(DISCLAIMER.trim()) {
        return reply.to_string();
    }

    format!("{}{}", reply.trim(), DISCLAIMER)
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
