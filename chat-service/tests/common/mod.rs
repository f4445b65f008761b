#![allow(dead_code)]

use chat_service::config::{
    ChatConfig, CorsConfig, GeminiConfig, GenerativeBackend, GenerativeConfig, HuggingFaceConfig,
    TranslationConfig,
};
use chat_service::services::providers::{GenerationParams, MockTextProvider, TextProvider};
use chat_service::services::translation::MockTranslator;
use chat_service::services::{ChatOrchestrator, GenerativeFallback, Translator};
use chat_service::startup::{AppState, Application};
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::Router;
use service_core::config::Config as CoreConfig;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Configuration with no credentials and translation switched off.
pub fn test_config() -> ChatConfig {
    ChatConfig {
        common: CoreConfig { port: 0 },
        generative: GenerativeConfig {
            backend: GenerativeBackend::HuggingFace,
            huggingface: HuggingFaceConfig {
                api_token: None,
                model: "google/flan-t5-base".to_string(),
                api_base: "http://127.0.0.1:9".to_string(),
            },
            gemini: GeminiConfig {
                api_key: None,
                model: "gemini-2.0-flash".to_string(),
                api_base: "http://127.0.0.1:9".to_string(),
            },
            timeout_secs: 1,
            max_new_tokens: 200,
        },
        translation: TranslationConfig {
            enabled: false,
            endpoint: "http://127.0.0.1:9/translate_a/single".to_string(),
            timeout_secs: 1,
        },
        cors: CorsConfig::default(),
    }
}

/// State with the given mocks in place of the remote backends.
pub fn test_state(
    translator: impl Translator + 'static,
    provider: Option<MockTextProvider>,
) -> AppState {
    let provider = provider.map(|p| Arc::new(p) as Arc<dyn TextProvider>);
    AppState {
        config: test_config(),
        orchestrator: ChatOrchestrator::new(
            Arc::new(translator),
            GenerativeFallback::new(provider, GenerationParams::default()),
        ),
    }
}

pub fn default_state() -> AppState {
    test_state(MockTranslator::new(), None)
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn(state: AppState) -> Self {
        let app = Application::build_with_state(state)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/healthz", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub async fn post_chat(&self, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/chat", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to send request")
    }
}

/// Stand-in for a remote API: answers every request with a fixed status and
/// body, and remembers what it was sent.
pub struct StubUpstream {
    pub base_url: String,
    requests: Arc<Mutex<Vec<(Uri, HeaderMap)>>>,
}

impl StubUpstream {
    pub async fn spawn(status: StatusCode, body: &'static str) -> Self {
        Self::spawn_delayed(status, body, Duration::ZERO).await
    }

    pub async fn spawn_delayed(status: StatusCode, body: &'static str, delay: Duration) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();

        let router = Router::new().fallback(move |uri: Uri, headers: HeaderMap| {
            let recorded = recorded.clone();
            async move {
                recorded.lock().unwrap().push((uri, headers));
                tokio::time::sleep(delay).await;
                (status, [(header::CONTENT_TYPE, "application/json")], body)
            }
        });

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub upstream");
        let addr = listener.local_addr().expect("Stub upstream has no address");

        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        StubUpstream {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<(Uri, HeaderMap)> {
        self.requests.lock().unwrap().clone()
    }
}
