use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::{ArtifactId, ArtifactState};

pub const DEFAULT_EXTENSION: &str = "bin";

/// A temporary file produced for exactly one client request.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub id: ArtifactId,
    pub prefix: String,
    pub extension: String,
    pub path: PathBuf,
    pub size_bytes: Option<u64>,
    pub state: ArtifactState,
    pub created_at: DateTime<Utc>,
}

impl Artifact {
    pub fn new(working_dir: &Path, prefix: &str, extension_hint: &str) -> Self {
        let id = ArtifactId::new();
        let prefix = sanitize_component(prefix).unwrap_or_else(|| "artifact".to_string());
        let extension =
            sanitize_component(extension_hint).unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
        let path = working_dir.join(format!("{}_{}.{}", prefix, id, extension));

        Self {
            id,
            prefix,
            extension,
            path,
            size_bytes: None,
            state: ArtifactState::Creating,
            created_at: Utc::now(),
        }
    }

    /// Rebuilds an artifact for a file found on disk with no live owner.
    /// `age` is how long ago the file was last modified.
    pub fn recovered(path: PathBuf, age: Duration) -> Self {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let id = ArtifactId::parse_from_file_name(&file_name).unwrap_or_default();
        let prefix = file_name
            .split('.')
            .next()
            .and_then(|stem| stem.rsplit_once('_'))
            .map(|(prefix, _)| prefix.to_string())
            .unwrap_or_default();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_string();
        let age_delta =
            chrono::Duration::from_std(age).unwrap_or_else(|_| chrono::Duration::zero());

        Self {
            id,
            prefix,
            extension,
            path,
            size_bytes: None,
            state: ArtifactState::Ready,
            created_at: Utc::now() - age_delta,
        }
    }

    /// `{prefix}_{id}`, the part of the file name that never changes.
    pub fn stem(&self) -> String {
        format!("{}_{}", self.prefix, self.id)
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.stem(), self.extension)
    }

    /// Retargets the file name before anything was written to it.
    pub fn set_extension(&mut self, extension: &str) {
        if self.state != ArtifactState::Creating {
            return;
        }
        if let Some(extension) = sanitize_component(extension) {
            self.path = self
                .path
                .with_file_name(format!("{}.{}", self.stem(), extension));
            self.extension = extension;
        }
    }

    pub fn age(&self) -> Duration {
        (Utc::now() - self.created_at).to_std().unwrap_or_default()
    }

    pub fn size_mb(&self) -> Option<f64> {
        self.size_bytes.map(bytes_to_mb)
    }
}

pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

fn sanitize_component(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('.')
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_ascii_lowercase())
    }
}
