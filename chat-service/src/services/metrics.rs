//! Metrics collection for chat-service.
//!
//! HTTP request metrics come from the `metrics` recorder installed here;
//! chat-specific counters live in a separate Prometheus registry. Both are
//! rendered together at `/metrics`. Recording before `init_metrics` is a no-op.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use prometheus::{IntCounterVec, Opts, Registry};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
pub static PROMETHEUS_REGISTRY: OnceLock<Registry> = OnceLock::new();
pub static CHAT_REPLIES_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static GENAI_PROVIDER_CALLS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static TRANSLATION_FAILURES_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize metrics collection. Call once at startup.
pub fn init_metrics() -> anyhow::Result<()> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus recorder: {}", e))?;

    if METRICS_HANDLE.set(handle).is_err() {
        anyhow::bail!("metrics already initialized");
    }

    let registry = Registry::new();

    let replies = IntCounterVec::new(
        Opts::new(
            "chat_replies_total",
            "Chat replies by the pipeline stage that produced them",
        ),
        &["source"],
    )?;

    let provider_calls = IntCounterVec::new(
        Opts::new(
            "genai_provider_calls_total",
            "Generative provider calls by provider and outcome",
        ),
        &["provider", "status"],
    )?;

    let translation_failures = IntCounterVec::new(
        Opts::new(
            "translation_failures_total",
            "Failed translations by direction",
        ),
        &["direction"],
    )?;

    registry.register(Box::new(replies.clone()))?;
    registry.register(Box::new(provider_calls.clone()))?;
    registry.register(Box::new(translation_failures.clone()))?;

    let _ = PROMETHEUS_REGISTRY.set(registry);
    let _ = CHAT_REPLIES_TOTAL.set(replies);
    let _ = GENAI_PROVIDER_CALLS_TOTAL.set(provider_calls);
    let _ = TRANSLATION_FAILURES_TOTAL.set(translation_failures);

    Ok(())
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string());

    if let Some(registry) = PROMETHEUS_REGISTRY.get() {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).ok();
        if let Ok(custom_metrics) = String::from_utf8(buffer) {
            output.push_str(&custom_metrics);
        }
    }

    output
}

pub fn record_reply(source: &str) {
    if let Some(counter) = CHAT_REPLIES_TOTAL.get() {
        counter.with_label_values(&[source]).inc();
    }
}

pub fn record_provider_call(provider: &str, status: &str) {
    if let Some(counter) = GENAI_PROVIDER_CALLS_TOTAL.get() {
        counter.with_label_values(&[provider, status]).inc();
    }
}

pub fn record_translation_failure(direction: &str) {
    if let Some(counter) = TRANSLATION_FAILURES_TOTAL.get() {
        counter.with_label_values(&[direction]).inc();
    }
}
