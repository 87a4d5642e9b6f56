use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::response::Response;
use serde::{Deserialize, Serialize};

use super::ApiError;
use super::payload::{attachment, body_or_default, required};
use crate::domain::{DownloadName, MediaKind, SearchQuery, VideoSummary};
use crate::presentation::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub results: Vec<VideoSummary>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DownloadRequest {
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[tracing::instrument(skip(state, params))]
pub async fn yt_search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = params
        .q
        .as_deref()
        .and_then(SearchQuery::parse)
        .ok_or(ApiError::MissingField("query"))?;

    let results = state.search.search(&query).await;
    Ok(Json(SearchResponse { results }))
}

#[tracing::instrument(skip(state, payload))]
pub async fn yt_download_handler(
    State(state): State<AppState>,
    payload: Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = body_or_default(payload);
    let url = required(request.url, "url")?;
    let kind = match request.kind.as_deref() {
        None => MediaKind::default(),
        Some(kind) => kind.parse::<MediaKind>().map_err(ApiError::BadRequest)?,
    };

    tracing::info!(url = %url, kind = %kind, "Download requested");

    let downloader = &state.downloader;
    let url = url.as_str();
    let produced = state
        .lifecycle
        .produce_in_place("yt", state.timeouts.download, |output_stem| async move {
            downloader.download(url, kind, &output_stem).await
        })
        .await?;

    let artifact = produced.artifact;
    let mime = kind.mime_for_extension(&artifact.extension);
    let download_name = DownloadName::from_raw(artifact.file_name());
    let stream = state.responder.serve(artifact, mime, download_name).await?;
    Ok(attachment(stream))
}
