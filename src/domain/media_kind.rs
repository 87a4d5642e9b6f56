use std::fmt;
use std::str::FromStr;

pub const FALLBACK_MIME: &str = "application/octet-stream";

/// What the caller wants out of a video URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MediaKind {
    #[default]
    Audio,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        }
    }

    /// yt-dlp format selector, preferring small containers that stream well.
    pub fn format_selector(&self) -> &'static str {
        match self {
            MediaKind::Audio => "bestaudio[ext=m4a]/bestaudio[ext=webm]/bestaudio[ext=mp3]/bestaudio",
            MediaKind::Video => {
                "best[ext=mp4][height<=480]/best[height<=480][ext=mp4]/best[ext=webm][height<=480]/best"
            }
        }
    }

    pub fn mime_for_extension(&self, extension: &str) -> &'static str {
        match (self, extension.to_ascii_lowercase().as_str()) {
            (MediaKind::Audio, "m4a") => "audio/mp4",
            (MediaKind::Audio, "webm") => "audio/webm",
            (MediaKind::Audio, "mp3") => "audio/mpeg",
            (MediaKind::Video, "mp4") => "video/mp4",
            (MediaKind::Video, "webm") => "video/webm",
            _ => FALLBACK_MIME,
        }
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "audio" => Ok(MediaKind::Audio),
            "video" => Ok(MediaKind::Video),
            other => Err(format!("Invalid media type: {}", other)),
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
