use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::Response;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use super::ApiError;
use super::payload::{attachment, body_or_default, required};
use crate::application::ports::{ArtifactStoreError, ImageGenerator};
use crate::domain::{DownloadName, ImageMode};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PromptRequest {
    pub prompt: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    pub mode: Option<String>,
    pub prompt: Option<String>,
}

#[derive(Serialize)]
pub struct GenerateResponse {
    pub image: String,
    pub mode: String,
}

#[tracing::instrument(skip(state, payload))]
pub async fn flux_handler(
    State(state): State<AppState>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let prompt = required(body_or_default(payload).prompt, "prompt")?;
    serve_png(&state, "flux", &prompt, state.flux.as_ref(), state.timeouts.flux).await
}

#[tracing::instrument(skip(state, payload))]
pub async fn genimage_handler(
    State(state): State<AppState>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let prompt = required(body_or_default(payload).prompt, "prompt")?;
    serve_png(
        &state,
        "genimage",
        &prompt,
        state.stability.as_ref(),
        state.timeouts.genimage,
    )
    .await
}

async fn serve_png(
    state: &AppState,
    prefix: &str,
    prompt: &str,
    generator: &dyn ImageGenerator,
    timeout: Duration,
) -> Result<Response, ApiError> {
    tracing::info!(prefix, prompt = %sanitize_prompt(prompt), "Image generation requested");

    let produced = state
        .lifecycle
        .produce_bytes(
            prefix,
            "png",
            timeout,
            generator.generate(prompt, ImageMode::Img),
        )
        .await?;

    let download_name = DownloadName::from_text(prefix, prompt, "png");
    let mime = produced.mime.unwrap_or_else(|| "image/png".to_string());
    let stream = state
        .responder
        .serve(produced.artifact, &mime, download_name)
        .await?;
    Ok(attachment(stream))
}

/// Returns the image inline as base64 instead of streaming a download.
#[tracing::instrument(skip(state, payload))]
pub async fn generate_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let request = body_or_default(payload);
    let mode = match request.mode.as_deref() {
        None => ImageMode::Img,
        Some(mode) => mode.parse::<ImageMode>().map_err(ApiError::BadRequest)?,
    };
    let prompt = required(request.prompt, "prompt")?;

    tracing::info!(mode = %mode, prompt = %sanitize_prompt(&prompt), "Inline generation requested");

    let produced = state
        .lifecycle
        .produce_bytes(
            "generate",
            "png",
            state.timeouts.generate,
            state.pollinations.generate(&prompt, mode),
        )
        .await?;

    let read = tokio::fs::read(&produced.artifact.path).await;
    state.lifecycle.discard(&produced.artifact).await;
    let bytes = read.map_err(ArtifactStoreError::from)?;

    Ok(Json(GenerateResponse {
        image: STANDARD.encode(bytes),
        mode: mode.to_string(),
    }))
}
