use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSummary {
    pub title: String,
    pub url: String,
    pub thumbnail: Option<String>,
    pub duration: Option<f64>,
}

impl VideoSummary {
    pub fn from_video_id(
        id: &str,
        title: Option<String>,
        thumbnail: Option<String>,
        duration: Option<f64>,
    ) -> Self {
        Self {
            title: title.unwrap_or_else(|| "Unknown".to_string()),
            url: format!("https://www.youtube.com/watch?v={}", id),
            thumbnail,
            duration,
        }
    }
}
