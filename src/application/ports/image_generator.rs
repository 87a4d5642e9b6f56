use async_trait::async_trait;

use super::{ProviderError, ProviderOutput};
use crate::domain::ImageMode;

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// `mode` selects framing for providers that support more than one size.
    async fn generate(&self, prompt: &str, mode: ImageMode)
    -> Result<ProviderOutput, ProviderError>;
}
