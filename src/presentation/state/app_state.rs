use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{
    ChatClient, ImageGenerator, MediaDownloader, NsfwDetector, SpeechSynthesizer,
};
use crate::application::services::{ArtifactLifecycle, SearchService, StreamingResponder};
use crate::presentation::config::ProviderSettings;

/// Upper bounds on each endpoint's provider work, applied by the
/// lifecycle on top of the adapters' own transport timeouts.
#[derive(Debug, Clone, Copy)]
pub struct RequestTimeouts {
    pub download: Duration,
    pub flux: Duration,
    pub genimage: Duration,
    pub generate: Duration,
    pub tts: Duration,
    pub nsfw: Duration,
}

impl RequestTimeouts {
    pub fn from_settings(providers: &ProviderSettings) -> Self {
        Self {
            download: Duration::from_secs(providers.download_timeout_secs),
            flux: Duration::from_secs(
                providers.flux_timeout_secs + providers.flux_download_timeout_secs,
            ),
            genimage: Duration::from_secs(providers.stability_timeout_secs),
            generate: Duration::from_secs(providers.pollinations_timeout_secs),
            tts: Duration::from_secs(providers.tts_timeout_secs),
            nsfw: Duration::from_secs(providers.nsfw_timeout_secs),
        }
    }
}

impl Default for RequestTimeouts {
    fn default() -> Self {
        Self::from_settings(&ProviderSettings::default())
    }
}

#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<ArtifactLifecycle>,
    pub responder: Arc<StreamingResponder>,
    pub search: Arc<SearchService>,
    pub downloader: Arc<dyn MediaDownloader>,
    pub flux: Arc<dyn ImageGenerator>,
    pub stability: Arc<dyn ImageGenerator>,
    pub pollinations: Arc<dyn ImageGenerator>,
    pub tts: Arc<dyn SpeechSynthesizer>,
    pub grok: Arc<dyn ChatClient>,
    pub gemini: Arc<dyn ChatClient>,
    pub nsfw: Arc<dyn NsfwDetector>,
    pub timeouts: RequestTimeouts,
    pub default_language: String,
}
