use crate::services::metrics;
use crate::services::providers::{GenerationParams, TextProvider};
use std::sync::Arc;

/// Best-effort wrapper around the configured [`TextProvider`].
///
/// Every failure mode (no provider, missing credential, transport error,
/// bad status, unexpected body, blank text) collapses to `None`.
#[derive(Clone)]
pub struct GenerativeFallback {
    provider: Option<Arc<dyn TextProvider>>,
    params: GenerationParams,
}

impl GenerativeFallback {
    pub fn new(provider: Option<Arc<dyn TextProvider>>, params: GenerationParams) -> Self {
        Self { provider, params }
    }

    /// No backend at all; `generate` always returns `None`.
    pub fn disabled() -> Self {
        Self::new(None, GenerationParams::default())
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.as_ref().is_some_and(|p| p.is_configured())
    }

    pub async fn generate(&self, text: &str) -> Option<String> {
        let provider = match &self.provider {
            Some(provider) if provider.is_configured() => provider,
            Some(provider) => {
                tracing::debug!(
                    provider = provider.name(),
                    "No credential configured, skipping generative fallback"
                );
                return None;
            }
            None => {
                tracing::debug!("No generative provider configured, skipping fallback");
                return None;
            }
        };

        match provider.generate(text, &self.params).await {
            Ok(reply) if !reply.trim().is_empty() => {
                metrics::record_provider_call(provider.name(), "success");
                Some(reply.trim().to_string())
            }
            Ok(_) => {
                tracing::warn!(provider = provider.name(), "Provider returned blank text");
                metrics::record_provider_call(provider.name(), "empty");
                None
            }
            Err(e) => {
                tracing::warn!(
                    provider = provider.name(),
                    error = %e,
                    "Generative fallback failed"
                );
                metrics::record_provider_call(provider.name(), e.kind());
                None
            }
        }
    }
}
