use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::{ArtifactStoreError, ProviderError};
use crate::application::services::LifecycleError;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Every failure an endpoint can report. Rendered as `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("missing {0}")]
    MissingField(&'static str),
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("artifact storage: {0}")]
    Storage(#[from] ArtifactStoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Lifecycle(LifecycleError::TooLarge { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Lifecycle(LifecycleError::Provider(e)) | ApiError::Provider(e) => {
                provider_status(e)
            }
            ApiError::Lifecycle(_) | ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn provider_status(error: &ProviderError) -> StatusCode {
    match error {
        ProviderError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ProviderError::NotConfigured(_)
        | ProviderError::RemoteFailure(_)
        | ProviderError::Timeout(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
