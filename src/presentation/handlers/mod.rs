mod chat;
mod error;
mod health;
mod images;
mod nsfi;
mod payload;
mod tts;
mod youtube;

pub use chat::{ai_handler, gemini_handler};
pub use error::{ApiError, ErrorResponse};
pub use health::health_handler;
pub use images::{flux_handler, generate_handler, genimage_handler};
pub use nsfi::nsfi_handler;
pub use tts::tts_handler;
pub use youtube::{yt_download_handler, yt_search_handler};
