mod flux_client;
mod gemini_client;
mod google_tts_client;
mod grok_client;
mod http;
mod nsfw_client;
mod pollinations_client;
mod stability_client;
mod yt_dlp_client;

pub use flux_client::FluxImageGenerator;
pub use gemini_client::GeminiChatClient;
pub use google_tts_client::{GoogleTtsClient, MAX_PIECE_CHARS, split_text};
pub use grok_client::GrokChatClient;
pub use nsfw_client::NsfwApiClient;
pub use pollinations_client::PollinationsImageGenerator;
pub use stability_client::StabilityImageGenerator;
pub use yt_dlp_client::{YtDlpClient, parse_search_listing};
