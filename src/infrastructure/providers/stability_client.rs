use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};

use super::http::{build_client, ensure_success, require_key};
use crate::application::ports::{ImageGenerator, ProviderError, ProviderOutput};
use crate::domain::ImageMode;

const IMAGE_SIZE: u32 = 512;
const STEPS: u32 = 30;

/// Stable Diffusion text-to-image through the Stability API.
pub struct StabilityImageGenerator {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Serialize)]
struct TextToImageRequest<'a> {
    text_prompts: Vec<TextPrompt<'a>>,
    width: u32,
    height: u32,
    samples: u32,
    steps: u32,
}

#[derive(Serialize)]
struct TextPrompt<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct TextToImageResponse {
    #[serde(default)]
    artifacts: Vec<GeneratedImage>,
}

#[derive(Deserialize)]
struct GeneratedImage {
    base64: String,
}

impl StabilityImageGenerator {
    pub fn new(api_key: Option<String>, base_url: String, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ImageGenerator for StabilityImageGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _mode: ImageMode,
    ) -> Result<ProviderOutput, ProviderError> {
        let api_key = require_key(&self.api_key, "Stable Diffusion")?;

        let body = TextToImageRequest {
            text_prompts: vec![TextPrompt { text: prompt }],
            width: IMAGE_SIZE,
            height: IMAGE_SIZE,
            samples: 1,
            steps: STEPS,
        };

        let response = self
            .client
            .post(format!("{}/v1/generation/text-to-image", self.base_url))
            .bearer_auth(api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest("stability generation", e))?;
        let result: TextToImageResponse = ensure_success(response, "stability generation")
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::RemoteFailure(format!("stability body: {}", e)))?;

        let encoded = result
            .artifacts
            .into_iter()
            .next()
            .map(|a| a.base64)
            .ok_or_else(|| {
                ProviderError::RemoteFailure("stability returned no artifacts".to_string())
            })?;
        let bytes = general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| ProviderError::RemoteFailure(format!("stability image decode: {}", e)))?;

        Ok(ProviderOutput::new(bytes, "png", "image/png"))
    }
}
