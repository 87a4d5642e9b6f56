use axum::Json;
use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, header};
use axum::response::Response;

use super::ApiError;
use crate::application::services::ArtifactStream;
use crate::domain::FALLBACK_MIME;

/// An unreadable or absent JSON body is treated as an empty object, so the
/// caller reports the first missing field instead of a parse error.
pub fn body_or_default<T: Default>(payload: Result<Json<T>, JsonRejection>) -> T {
    match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable JSON body");
            T::default()
        }
    }
}

pub fn required(value: Option<String>, field: &'static str) -> Result<String, ApiError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ApiError::MissingField(field)),
    }
}

/// Turns an artifact stream into a download response. Dropping the body
/// (client gone) drops the stream and with it the artifact.
pub fn attachment(stream: ArtifactStream) -> Response {
    let content_type = HeaderValue::from_str(&stream.mime)
        .unwrap_or_else(|_| HeaderValue::from_static(FALLBACK_MIME));
    let disposition =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", stream.download_name))
            .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    let mut response = Response::new(Body::from_stream(stream.body));
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, content_type);
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(stream.content_length));
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    response
}
