use std::path::Path;

use async_trait::async_trait;

use super::ProviderError;

#[async_trait]
pub trait NsfwDetector: Send + Sync {
    /// Returns `true` when the image at `image_path` is safe.
    async fn is_safe(&self, image_path: &Path) -> Result<bool, ProviderError>;
}
