use async_trait::async_trait;

use super::{ProviderError, ProviderOutput};

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, language: &str)
    -> Result<ProviderOutput, ProviderError>;
}
