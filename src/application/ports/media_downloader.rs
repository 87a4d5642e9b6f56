use std::path::Path;

use async_trait::async_trait;

use super::ProviderError;
use crate::domain::{MediaKind, SearchQuery, VideoSummary};

/// Writes straight to disk instead of returning bytes, so large media is
/// never held in memory. The produced file is `{output_stem}.{ext}` with an
/// extension chosen by the downloader.
#[async_trait]
pub trait MediaDownloader: Send + Sync {
    async fn download(
        &self,
        url: &str,
        kind: MediaKind,
        output_stem: &Path,
    ) -> Result<(), ProviderError>;
}

#[async_trait]
pub trait VideoSearcher: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<VideoSummary>, ProviderError>;
}
