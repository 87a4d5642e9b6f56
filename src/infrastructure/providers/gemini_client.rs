use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http::{build_client, ensure_success, require_key};
use crate::application::ports::{ChatClient, ChatReply, ChatRequest, ProviderError};

pub struct GeminiChatClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiChatClient {
    pub fn new(
        api_key: Option<String>,
        base_url: String,
        model: String,
        timeout: Duration,
    ) -> Self {
        Self {
            client: build_client(timeout),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }
}

#[async_trait]
impl ChatClient for GeminiChatClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply, ProviderError> {
        let api_key = require_key(&self.api_key, "Gemini")?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
        };

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest("gemini", e))?;
        let result: GenerateContentResponse = ensure_success(response, "gemini")
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::RemoteFailure(format!("gemini body: {}", e)))?;

        let text = result
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| {
                ProviderError::RemoteFailure("gemini returned no candidates".to_string())
            })?;

        Ok(ChatReply {
            response: text,
            conversation_id: None,
        })
    }
}
