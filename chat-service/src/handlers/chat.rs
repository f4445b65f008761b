use axum::{extract::rejection::JsonRejection, extract::State, Json};
use service_core::error::AppError;
use validator::Validate;

use crate::models::{ChatRequest, ChatResponse};
use crate::startup::AppState;

/// `POST /chat`. Pipeline failures never surface here; only malformed or
/// oversized input is rejected.
#[tracing::instrument(skip(state, payload))]
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload?;
    request.validate()?;

    Ok(Json(state.orchestrator.respond(&request).await))
}
