use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use super::ApiError;
use super::payload::{body_or_default, required};
use crate::application::ports::ChatRequest;
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AiRequest {
    pub prompt: Option<String>,
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
pub struct AiResponse {
    pub response: String,
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
pub struct GeminiResponse {
    pub response: String,
}

#[tracing::instrument(skip(state, payload))]
pub async fn ai_handler(
    State(state): State<AppState>,
    payload: Result<Json<AiRequest>, JsonRejection>,
) -> Result<Json<AiResponse>, ApiError> {
    let request = body_or_default(payload);
    let prompt = required(request.prompt, "prompt")?;

    let reply = state
        .grok
        .complete(&ChatRequest {
            prompt,
            conversation_id: request.conversation_id,
        })
        .await?;

    tracing::info!(response = %sanitize_prompt(&reply.response), "AI response generated");
    Ok(Json(AiResponse {
        response: reply.response,
        conversation_id: reply.conversation_id,
    }))
}

#[tracing::instrument(skip(state, payload))]
pub async fn gemini_handler(
    State(state): State<AppState>,
    payload: Result<Json<AiRequest>, JsonRejection>,
) -> Result<Json<GeminiResponse>, ApiError> {
    let prompt = required(body_or_default(payload).prompt, "prompt")?;

    let reply = state
        .gemini
        .complete(&ChatRequest {
            prompt,
            conversation_id: None,
        })
        .await?;

    tracing::info!(response = %sanitize_prompt(&reply.response), "Gemini response generated");
    Ok(Json(GeminiResponse {
        response: reply.response,
    }))
}
