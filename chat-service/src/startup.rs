//! Application startup and lifecycle management.

use crate::config::{ChatConfig, CorsConfig, GenerativeBackend};
use crate::handlers;
use crate::services::providers::{
    GeminiTextProvider, GenerationParams, HuggingFaceProvider, TextProvider,
};
use crate::services::{
    ChatOrchestrator, DisabledTranslator, GenerativeFallback, GoogleTranslator, Translator,
};
use axum::{
    http::HeaderValue,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics_middleware, request_id_middleware, security_headers_middleware, REQUEST_ID_HEADER,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ChatConfig,
    pub orchestrator: ChatOrchestrator,
}

impl AppState {
    /// Wire translator and generative backend from configuration. Missing
    /// credentials disable the backend; they never fail startup.
    pub fn from_config(config: ChatConfig) -> Result<Self, AppError> {
        let provider = build_provider(&config)?;
        let params = GenerationParams {
            max_new_tokens: config.generative.max_new_tokens,
            ..GenerationParams::default()
        };
        let generator = GenerativeFallback::new(provider, params);

        let translator: Arc<dyn Translator> = if config.translation.enabled {
            let translator = GoogleTranslator::new(&config.translation)
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;
            tracing::info!(endpoint = %config.translation.endpoint, "Translation enabled");
            Arc::new(translator)
        } else {
            tracing::info!("Translation disabled, replies stay in English");
            Arc::new(DisabledTranslator)
        };

        Ok(Self {
            orchestrator: ChatOrchestrator::new(translator, generator),
            config,
        })
    }
}

fn build_provider(config: &ChatConfig) -> Result<Option<Arc<dyn TextProvider>>, AppError> {
    let generative = &config.generative;
    let to_config_error = |e| AppError::ConfigError(anyhow::anyhow!("{}", e));

    let provider: Option<Arc<dyn TextProvider>> = match generative.backend {
        GenerativeBackend::HuggingFace if generative.huggingface.api_token.is_some() => {
            tracing::info!(
                model = %generative.huggingface.model,
                "Initialized Hugging Face text provider"
            );
            Some(Arc::new(
                HuggingFaceProvider::new(generative.huggingface.clone(), generative.timeout())
                    .map_err(to_config_error)?,
            ))
        }
        GenerativeBackend::Gemini if generative.gemini.api_key.is_some() => {
            tracing::info!(
                model = %generative.gemini.model,
                "Initialized Gemini text provider"
            );
            Some(Arc::new(
                GeminiTextProvider::new(generative.gemini.clone(), generative.timeout())
                    .map_err(to_config_error)?,
            ))
        }
        backend => {
            tracing::warn!(
                ?backend,
                "No API credential for generative backend, unmatched messages get the default reply"
            );
            None
        }
    };

    Ok(provider)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}. Skipping.", origin, e);
                None
            }
        })
        .collect();

    layer.allow_origin(origins)
}

/// Build the HTTP router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    Router::new()
        .route("/chat", post(handlers::chat))
        .route("/image-log", post(handlers::image_log))
        .route("/healthz", get(handlers::healthz))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: ChatConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(config)?;
        Self::build_with_state(state).await
    }

    /// Build around pre-wired state (port 0 = random port for testing).
    pub async fn build_with_state(state: AppState) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            generative_enabled = state.orchestrator.generator().is_enabled(),
            "Chat service listening"
        );

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Run until `shutdown` resolves, then drain in-flight requests.
    pub async fn run_until<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                std::io::Error::other(format!("HTTP server error: {}", e))
            })
    }
}
