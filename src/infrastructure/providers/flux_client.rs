use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http::{build_client, ensure_success, require_key};
use crate::application::ports::{ImageGenerator, ProviderError, ProviderOutput};
use crate::domain::ImageMode;

const MODEL_VERSION: &str = "flux.1-dev";
const IMAGE_SIZE: u32 = 512;

/// Flux.1 image generation through the Replicate predictions API.
pub struct FluxImageGenerator {
    client: reqwest::Client,
    download_client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Serialize)]
struct PredictionRequest<'a> {
    version: &'a str,
    input: PredictionInput<'a>,
}

#[derive(Serialize)]
struct PredictionInput<'a> {
    prompt: &'a str,
    num_outputs: u32,
    output_format: &'a str,
    width: u32,
    height: u32,
}

#[derive(Deserialize)]
struct Prediction {
    #[serde(default)]
    output: Vec<String>,
}

impl FluxImageGenerator {
    pub fn new(
        api_key: Option<String>,
        base_url: String,
        timeout: Duration,
        download_timeout: Duration,
    ) -> Self {
        Self {
            client: build_client(timeout),
            download_client: build_client(download_timeout),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ImageGenerator for FluxImageGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _mode: ImageMode,
    ) -> Result<ProviderOutput, ProviderError> {
        let api_key = require_key(&self.api_key, "Flux")?;

        let body = PredictionRequest {
            version: MODEL_VERSION,
            input: PredictionInput {
                prompt,
                num_outputs: 1,
                output_format: "png",
                width: IMAGE_SIZE,
                height: IMAGE_SIZE,
            },
        };

        let response = self
            .client
            .post(format!("{}/v1/predictions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest("flux prediction", e))?;
        let prediction: Prediction = ensure_success(response, "flux prediction")
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::RemoteFailure(format!("flux prediction body: {}", e)))?;

        let image_url = prediction
            .output
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::RemoteFailure("flux returned no output".to_string()))?;

        let image = self
            .download_client
            .get(&image_url)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest("flux image download", e))?;
        let bytes = ensure_success(image, "flux image download")
            .await?
            .bytes()
            .await
            .map_err(|e| ProviderError::from_reqwest("flux image body", e))?;

        tracing::debug!(bytes = bytes.len(), "Flux image downloaded");
        Ok(ProviderOutput::new(bytes, "png", "image/png"))
    }
}
