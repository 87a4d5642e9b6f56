use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;

use super::http::{build_client, ensure_success, require_key};
use crate::application::ports::{NsfwDetector, ProviderError};

pub struct NsfwApiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

#[derive(Deserialize)]
struct DetectionResponse {
    is_safe: Option<bool>,
}

impl NsfwApiClient {
    pub fn new(api_key: Option<String>, endpoint: String, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            api_key,
            endpoint,
        }
    }
}

#[async_trait]
impl NsfwDetector for NsfwApiClient {
    async fn is_safe(&self, image_path: &Path) -> Result<bool, ProviderError> {
        let api_key = require_key(&self.api_key, "NSFW")?;

        let data = tokio::fs::read(image_path)
            .await
            .map_err(|e| ProviderError::RemoteFailure(format!("read staged image: {}", e)))?;
        let file_name = image_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image.png")
            .to_string();
        let part = multipart::Part::bytes(data).file_name(file_name);
        let form = multipart::Form::new().part("image", part);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest("nsfw detection", e))?;
        let detection: DetectionResponse = ensure_success(response, "nsfw detection")
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::RemoteFailure(format!("nsfw detection body: {}", e)))?;

        Ok(detection.is_safe.unwrap_or(true))
    }
}
