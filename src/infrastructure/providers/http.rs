use std::time::Duration;

use reqwest::{Client, Response};

use crate::application::ports::ProviderError;

pub(crate) fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default HTTP client");
            Client::new()
        })
}

pub(crate) fn require_key<'a>(
    api_key: &'a Option<String>,
    provider: &str,
) -> Result<&'a str, ProviderError> {
    match api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(ProviderError::NotConfigured(provider.to_string())),
    }
}

pub(crate) async fn ensure_success(
    response: Response,
    context: &str,
) -> Result<Response, ProviderError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    Err(ProviderError::RemoteFailure(format!(
        "{} returned HTTP {}: {}",
        context, status, body
    )))
}
