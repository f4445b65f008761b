use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe used by the chat widget; independent of configuration.
pub async fn healthz() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "chat-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Always ready: external backends are optional.
pub async fn readiness_check() -> impl IntoResponse {
    StatusCode::OK
}
