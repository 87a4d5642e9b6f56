use std::time::Duration;

use async_trait::async_trait;

use super::http::{build_client, ensure_success};
use crate::application::ports::{ImageGenerator, ProviderError, ProviderOutput};
use crate::domain::ImageMode;

/// Keyless image generation via Pollinations. A fresh random seed per call
/// keeps identical prompts from returning the same picture.
pub struct PollinationsImageGenerator {
    client: reqwest::Client,
    base_url: String,
}

impl PollinationsImageGenerator {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn prompt_url(
        &self,
        prompt: &str,
        mode: ImageMode,
        seed: u32,
    ) -> Result<reqwest::Url, ProviderError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ProviderError::InvalidInput(format!("pollinations base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                ProviderError::InvalidInput("pollinations base url cannot be a base".to_string())
            })?
            .pop_if_empty()
            .push("prompt")
            .push(&mode.decorate_prompt(prompt));

        let (width, height) = mode.dimensions();
        url.query_pairs_mut()
            .append_pair("seed", &seed.to_string())
            .append_pair("width", &width.to_string())
            .append_pair("height", &height.to_string())
            .append_pair("nologo", "true")
            .append_pair("enhance", "true");
        Ok(url)
    }
}

#[async_trait]
impl ImageGenerator for PollinationsImageGenerator {
    async fn generate(
        &self,
        prompt: &str,
        mode: ImageMode,
    ) -> Result<ProviderOutput, ProviderError> {
        let seed: u32 = rand::random();
        let url = self.prompt_url(prompt, mode, seed)?;

        tracing::debug!(mode = %mode, seed = seed, "Requesting pollinations image");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest("pollinations", e))?;
        let response = ensure_success(response, "pollinations").await?;

        let mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();
        let extension = match mime.as_str() {
            "image/png" => "png",
            "image/webp" => "webp",
            _ => "jpg",
        };
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::from_reqwest("pollinations body", e))?;

        Ok(ProviderOutput::new(bytes, extension, &mime))
    }
}
