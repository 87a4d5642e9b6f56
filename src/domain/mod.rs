mod artifact;
mod artifact_id;
mod artifact_state;
mod download_name;
mod image_mode;
mod media_kind;
mod search_query;
mod video_summary;

pub use artifact::{Artifact, DEFAULT_EXTENSION, bytes_to_mb};
pub use artifact_id::ArtifactId;
pub use artifact_state::ArtifactState;
pub use download_name::{DownloadName, secure_filename};
pub use image_mode::ImageMode;
pub use media_kind::{FALLBACK_MIME, MediaKind};
pub use search_query::SearchQuery;
pub use video_summary::VideoSummary;
