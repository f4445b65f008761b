//! Mock provider implementation for testing.

use super::{GenerationParams, ProviderError, TextProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone)]
enum MockBehavior {
    Echo,
    Reply(String),
    Fail,
}

/// Mock text provider for testing.
pub struct MockTextProvider {
    enabled: bool,
    behavior: MockBehavior,
    calls: AtomicUsize,
}

impl MockTextProvider {
    /// Echoes the prompt back when enabled; reports "not configured" otherwise.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            behavior: MockBehavior::Echo,
            calls: AtomicUsize::new(0),
        }
    }

    /// Always answers with `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            enabled: true,
            behavior: MockBehavior::Reply(reply.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Configured, but every call fails like an upstream outage.
    pub fn failing() -> Self {
        Self {
            enabled: true,
            behavior: MockBehavior::Fail,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `generate` calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_configured(&self) -> bool {
        self.enabled
    }

    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ));
        }

        match &self.behavior {
            MockBehavior::Echo => Ok(format!("Mock response for: {}", prompt)),
            MockBehavior::Reply(reply) => Ok(reply.clone()),
            MockBehavior::Fail => Err(ProviderError::ApiError(
                "Mock API error 503: model is loading".to_string(),
            )),
        }
    }
}
