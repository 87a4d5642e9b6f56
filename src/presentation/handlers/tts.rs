use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::Response;
use serde::Deserialize;

use super::ApiError;
use super::payload::{attachment, body_or_default, required};
use crate::domain::DownloadName;
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TtsRequest {
    pub text: Option<String>,
    pub lang: Option<String>,
}

#[tracing::instrument(skip(state, payload))]
pub async fn tts_handler(
    State(state): State<AppState>,
    payload: Result<Json<TtsRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = body_or_default(payload);
    let text = required(request.text, "text")?;
    let language = request
        .lang
        .filter(|lang| !lang.is_empty())
        .unwrap_or_else(|| state.default_language.clone());

    tracing::info!(language = %language, text = %sanitize_prompt(&text), "Speech requested");

    let produced = state
        .lifecycle
        .produce_bytes(
            "tts",
            "mp3",
            state.timeouts.tts,
            state.tts.synthesize(&text, &language),
        )
        .await?;

    let download_name = DownloadName::from_text("tts", &text, "mp3");
    let mime = produced.mime.unwrap_or_else(|| "audio/mpeg".to_string());
    let stream = state
        .responder
        .serve(produced.artifact, &mime, download_name)
        .await?;
    Ok(attachment(stream))
}
