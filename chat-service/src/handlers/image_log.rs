use axum::Json;
use serde_json::{json, Value};

/// `POST /image-log`: records a client-side image classification result.
/// Nothing is persisted.
pub async fn image_log(Json(payload): Json<Value>) -> Json<Value> {
    tracing::info!(payload = %payload, "Image log");
    Json(json!({ "ok": true }))
}
