mod artifact_store;
mod chat_client;
mod content_provider;
mod image_generator;
mod media_downloader;
mod nsfw_detector;
mod speech_synthesizer;

pub use artifact_store::{ArtifactStore, ArtifactStoreError, DeleteOutcome, SizeCheck, StaleFile};
pub use chat_client::{ChatClient, ChatReply, ChatRequest};
pub use content_provider::{ProviderError, ProviderOutput};
pub use image_generator::ImageGenerator;
pub use media_downloader::{MediaDownloader, VideoSearcher};
pub use nsfw_detector::NsfwDetector;
pub use speech_synthesizer::SpeechSynthesizer;
