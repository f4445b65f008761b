//! Mock translator for testing.

use super::{TranslationError, Translator};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Looks translations up in a phrasebook and tags anything unknown with the
/// target language, e.g. `"[hi] Fever often..."`.
#[derive(Default)]
pub struct MockTranslator {
    phrases: HashMap<String, String>,
    fail_inbound: bool,
    fail_outbound: bool,
    calls: AtomicUsize,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_phrase(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.phrases.insert(from.into(), to.into());
        self
    }

    /// Fails translations into English.
    pub fn failing_inbound(mut self) -> Self {
        self.fail_inbound = true;
        self
    }

    /// Fails translations out of English.
    pub fn failing_outbound(mut self) -> Self {
        self.fail_outbound = true;
        self
    }

    pub fn failing() -> Self {
        Self::new().failing_inbound().failing_outbound()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for MockTranslator {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let inbound = target == "en" && source != "en";
        if (inbound && self.fail_inbound) || (!inbound && self.fail_outbound) {
            return Err(TranslationError::NetworkError(
                "mock translator unavailable".to_string(),
            ));
        }

        Ok(self
            .phrases
            .get(text)
            .cloned()
            .unwrap_or_else(|| format!("[{}] {}", target, text)))
    }
}
