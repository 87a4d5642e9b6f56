use async_trait::async_trait;

use super::ProviderError;

#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub prompt: String,
    pub conversation_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub response: String,
    pub conversation_id: Option<String>,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply, ProviderError>;
}
