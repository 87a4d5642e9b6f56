use axum::Json;
use axum::extract::{Multipart, State};
use serde::Serialize;

use super::ApiError;
use crate::application::ports::{ProviderError, ProviderOutput};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct NsfiResponse {
    pub is_safe: bool,
}

/// Stages the upload as an artifact, classifies it, and deletes it again
/// whatever the verdict.
#[tracing::instrument(skip(state, multipart))]
pub async fn nsfi_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<NsfiResponse>, ApiError> {
    let mut image = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Err(ApiError::BadRequest(format!(
                    "Failed to read multipart: {}",
                    e
                )));
            }
        };
        if field.name() != Some("image") {
            continue;
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read image: {}", e)))?;
        image = Some(data);
        break;
    }

    let data = image
        .filter(|data| !data.is_empty())
        .ok_or(ApiError::MissingField("image"))?;

    let staged = state
        .lifecycle
        .produce_bytes("nsfi", "png", state.timeouts.nsfw, async move {
            Ok(ProviderOutput::new(data, "png", "image/png"))
        })
        .await?;

    let verdict = tokio::time::timeout(
        state.timeouts.nsfw,
        state.nsfw.is_safe(&staged.artifact.path),
    )
    .await;
    state.lifecycle.discard(&staged.artifact).await;

    let is_safe = verdict.map_err(|_| {
        ProviderError::Timeout(format!(
            "nsfw detection exceeded {}s",
            state.timeouts.nsfw.as_secs()
        ))
    })??;

    tracing::info!(is_safe, "NSFI check finished");
    Ok(Json(NsfiResponse { is_safe }))
}
