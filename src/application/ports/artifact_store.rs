use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::{Artifact, ArtifactId, ArtifactState};

/// Owns the working directory and every artifact file inside it.
#[async_trait::async_trait]
pub trait ArtifactStore: Send + Sync {
    fn working_dir(&self) -> &Path;

    fn max_size_bytes(&self) -> u64;

    async fn allocate(
        &self,
        prefix: &str,
        extension_hint: &str,
    ) -> Result<Artifact, ArtifactStoreError>;

    /// Persists provider bytes and moves the artifact to `Ready`.
    async fn write(&self, artifact: &mut Artifact, data: &[u8]) -> Result<u64, ArtifactStoreError>;

    /// Reconciles the artifact with whatever file a provider wrote for it.
    async fn finalize(&self, artifact: &mut Artifact) -> Result<(), ArtifactStoreError>;

    async fn check_size(&self, artifact: &mut Artifact) -> Result<SizeCheck, ArtifactStoreError>;

    async fn mark_serving(&self, artifact: &mut Artifact) -> Result<(), ArtifactStoreError>;

    /// Idempotent. Never fails: persistent errors are logged and reported as
    /// [`DeleteOutcome::GaveUp`].
    async fn delete(&self, artifact: &Artifact) -> DeleteOutcome;

    async fn stale_files(&self, max_age: Duration) -> Result<Vec<StaleFile>, ArtifactStoreError>;

    /// Removes every regular file from the working directory.
    async fn wipe(&self) -> Result<usize, ArtifactStoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeCheck {
    pub ok: bool,
    pub size_mb: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed,
    AlreadyGone,
    GaveUp,
}

impl DeleteOutcome {
    pub fn is_gone(&self) -> bool {
        matches!(self, DeleteOutcome::Removed | DeleteOutcome::AlreadyGone)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaleFile {
    pub path: PathBuf,
    pub age: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactStoreError {
    #[error("artifact file not found: {0}")]
    NotFound(String),
    #[error("artifact {0} was already deleted")]
    Deleted(ArtifactId),
    #[error("invalid artifact transition {from} -> {to}")]
    InvalidTransition {
        from: ArtifactState,
        to: ArtifactState,
    },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
