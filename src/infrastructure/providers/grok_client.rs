use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::http::{build_client, ensure_success, require_key};
use crate::application::ports::{ChatClient, ChatReply, ChatRequest, ProviderError};

/// Chat completions against the xAI (OpenAI-compatible) API.
pub struct GrokChatClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    conversation_id: Option<&'a str>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    conversation_id: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl GrokChatClient {
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
impl ChatClient for GrokChatClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply, ProviderError> {
        let api_key = require_key(&self.api_key, "AI")?;

        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            conversation_id: request.conversation_id.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest("chat completion", e))?;
        let completion: ChatCompletionResponse = ensure_success(response, "chat completion")
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::RemoteFailure(format!("chat completion body: {}", e)))?;

        let response = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::RemoteFailure("empty choices".to_string()))?;

        Ok(ChatReply {
            response,
            conversation_id: completion
                .conversation_id
                .or_else(|| request.conversation_id.clone()),
        })
    }
}
