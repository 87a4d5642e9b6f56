use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime};

use tokio::sync::Mutex as AsyncMutex;

use crate::application::ports::{
    ArtifactStore, ArtifactStoreError, DeleteOutcome, SizeCheck, StaleFile,
};
use crate::domain::{Artifact, ArtifactId, ArtifactState, bytes_to_mb};

pub const DEFAULT_MAX_SIZE_BYTES: u64 = 95 * 1024 * 1024;
pub const DEFAULT_DELETE_RETRY_DELAY: Duration = Duration::from_millis(500);

const FRAGMENT_MARKERS: [&str; 3] = [".part", ".ytdl", ".temp"];

// Windows sharing/lock violations surface as raw OS errors.
const ERROR_SHARING_VIOLATION: i32 = 32;
const ERROR_LOCK_VIOLATION: i32 = 33;

type StateCell = Arc<AsyncMutex<ArtifactState>>;

/// Artifact store backed by a single local working directory.
///
/// Every live artifact owns its own async lock. Writes, finalization and
/// deletion of one artifact serialize on that lock; unrelated artifacts
/// never wait on each other. An artifact absent from the registry has been
/// deleted (or was never allocated by this process).
pub struct LocalArtifactStore {
    working_dir: PathBuf,
    max_size_bytes: u64,
    retry_delay: Duration,
    registry: Mutex<HashMap<ArtifactId, StateCell>>,
}

impl LocalArtifactStore {
    pub fn new(
        working_dir: PathBuf,
        max_size_bytes: u64,
        retry_delay: Duration,
    ) -> Result<Self, ArtifactStoreError> {
        std::fs::create_dir_all(&working_dir)?;
        let working_dir = working_dir.canonicalize()?;
        Ok(Self {
            working_dir,
            max_size_bytes,
            retry_delay,
            registry: Mutex::new(HashMap::new()),
        })
    }

    pub fn with_defaults(working_dir: PathBuf) -> Result<Self, ArtifactStoreError> {
        Self::new(working_dir, DEFAULT_MAX_SIZE_BYTES, DEFAULT_DELETE_RETRY_DELAY)
    }

    pub fn live_artifacts(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn cell(&self, id: ArtifactId) -> Option<StateCell> {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    fn register(&self, id: ArtifactId) -> bool {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        if registry.contains_key(&id) {
            return false;
        }
        registry.insert(id, Arc::new(AsyncMutex::new(ArtifactState::Creating)));
        true
    }

    fn forget(&self, id: ArtifactId) {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }

    fn live_cell(&self, artifact: &Artifact) -> Result<StateCell, ArtifactStoreError> {
        self.cell(artifact.id)
            .ok_or(ArtifactStoreError::Deleted(artifact.id))
    }

    async fn remove_with_retry(&self, path: &Path) -> DeleteOutcome {
        match tokio::fs::remove_file(path).await {
            Ok(()) => DeleteOutcome::Removed,
            Err(e) if e.kind() == io::ErrorKind::NotFound => DeleteOutcome::AlreadyGone,
            Err(e) if is_transient(&e) => {
                tracing::debug!(
                    error = %e,
                    path = %path.display(),
                    retry_in_ms = self.retry_delay.as_millis() as u64,
                    "Artifact busy, retrying delete"
                );
                tokio::time::sleep(self.retry_delay).await;
                match tokio::fs::remove_file(path).await {
                    Ok(()) => DeleteOutcome::Removed,
                    Err(e) if e.kind() == io::ErrorKind::NotFound => DeleteOutcome::AlreadyGone,
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            path = %path.display(),
                            "Giving up on artifact delete"
                        );
                        DeleteOutcome::GaveUp
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "Failed to delete artifact");
                DeleteOutcome::GaveUp
            }
        }
    }

    /// Removes leftovers a direct-write provider produced under the
    /// artifact's stem before it was finalized.
    async fn remove_fragments(&self, artifact: &Artifact) {
        let prefix = format!("{}.", artifact.stem());
        let names = match self.file_names_with_prefix(&prefix).await {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!(error = %e, stem = %artifact.stem(), "Failed to scan for fragments");
                return;
            }
        };
        for name in names {
            let path = self.working_dir.join(&name);
            if path != artifact.path {
                self.remove_with_retry(&path).await;
            }
        }
    }

    async fn file_names_with_prefix(&self, prefix: &str) -> Result<Vec<String>, io::Error> {
        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.working_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if let Some(name) = entry.file_name().to_str()
                && name.starts_with(prefix)
            {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

#[async_trait::async_trait]
impl ArtifactStore for LocalArtifactStore {
    fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    async fn allocate(
        &self,
        prefix: &str,
        extension_hint: &str,
    ) -> Result<Artifact, ArtifactStoreError> {
        tokio::fs::create_dir_all(&self.working_dir).await?;

        loop {
            let artifact = Artifact::new(&self.working_dir, prefix, extension_hint);
            if tokio::fs::try_exists(&artifact.path).await? {
                continue;
            }
            if self.register(artifact.id) {
                tracing::debug!(
                    artifact_id = %artifact.id,
                    path = %artifact.path.display(),
                    "Artifact allocated"
                );
                return Ok(artifact);
            }
        }
    }

    async fn write(&self, artifact: &mut Artifact, data: &[u8]) -> Result<u64, ArtifactStoreError> {
        let cell = self.live_cell(artifact)?;
        let mut state = cell.lock().await;
        if *state == ArtifactState::Deleted {
            return Err(ArtifactStoreError::Deleted(artifact.id));
        }
        if *state != ArtifactState::Creating {
            return Err(ArtifactStoreError::InvalidTransition {
                from: *state,
                to: ArtifactState::Ready,
            });
        }

        tokio::fs::write(&artifact.path, data).await?;
        let size = data.len() as u64;

        *state = ArtifactState::Ready;
        artifact.state = ArtifactState::Ready;
        artifact.size_bytes = Some(size);

        tracing::debug!(artifact_id = %artifact.id, bytes = size, "Artifact written");
        Ok(size)
    }

    async fn finalize(&self, artifact: &mut Artifact) -> Result<(), ArtifactStoreError> {
        let cell = self.live_cell(artifact)?;
        let mut state = cell.lock().await;
        match *state {
            ArtifactState::Deleted => return Err(ArtifactStoreError::Deleted(artifact.id)),
            ArtifactState::Creating | ArtifactState::Ready => {}
            other => {
                return Err(ArtifactStoreError::InvalidTransition {
                    from: other,
                    to: ArtifactState::Ready,
                });
            }
        }

        let prefix = format!("{}.", artifact.stem());
        let produced = self
            .file_names_with_prefix(&prefix)
            .await?
            .into_iter()
            .find(|name| !FRAGMENT_MARKERS.iter().any(|m| name.contains(m)))
            .ok_or_else(|| ArtifactStoreError::NotFound(artifact.stem()))?;

        let extension = produced
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_string();
        let path = self.working_dir.join(&produced);
        let size = tokio::fs::metadata(&path).await?.len();

        artifact.path = path;
        artifact.extension = extension;
        artifact.size_bytes = Some(size);
        artifact.state = ArtifactState::Ready;
        *state = ArtifactState::Ready;

        tracing::debug!(
            artifact_id = %artifact.id,
            file = %produced,
            bytes = size,
            "Artifact finalized"
        );
        Ok(())
    }

    async fn check_size(&self, artifact: &mut Artifact) -> Result<SizeCheck, ArtifactStoreError> {
        let cell = self.live_cell(artifact)?;
        let state = cell.lock().await;
        if *state == ArtifactState::Deleted {
            return Err(ArtifactStoreError::Deleted(artifact.id));
        }

        let size = match tokio::fs::metadata(&artifact.path).await {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ArtifactStoreError::NotFound(
                    artifact.path.display().to_string(),
                ));
            }
            Err(e) => return Err(ArtifactStoreError::Io(e)),
        };
        artifact.size_bytes = Some(size);

        Ok(SizeCheck {
            ok: size <= self.max_size_bytes,
            size_mb: bytes_to_mb(size),
        })
    }

    async fn mark_serving(&self, artifact: &mut Artifact) -> Result<(), ArtifactStoreError> {
        let cell = self.live_cell(artifact)?;
        let mut state = cell.lock().await;
        if !state.can_transition_to(ArtifactState::Serving) {
            return Err(match *state {
                ArtifactState::Deleted => ArtifactStoreError::Deleted(artifact.id),
                from => ArtifactStoreError::InvalidTransition {
                    from,
                    to: ArtifactState::Serving,
                },
            });
        }
        *state = ArtifactState::Serving;
        artifact.state = ArtifactState::Serving;
        Ok(())
    }

    async fn delete(&self, artifact: &Artifact) -> DeleteOutcome {
        let Some(cell) = self.cell(artifact.id) else {
            return self.remove_with_retry(&artifact.path).await;
        };

        let mut state = cell.lock().await;
        if *state == ArtifactState::Deleted {
            return DeleteOutcome::AlreadyGone;
        }

        let unfinished = *state == ArtifactState::Creating;
        let outcome = self.remove_with_retry(&artifact.path).await;
        if unfinished {
            self.remove_fragments(artifact).await;
        }

        // Ownership ends here even when the file refused to go; the janitor
        // picks up whatever is left on disk.
        *state = ArtifactState::Deleted;
        drop(state);
        self.forget(artifact.id);

        match outcome {
            DeleteOutcome::Removed => {
                tracing::info!(
                    artifact_id = %artifact.id,
                    path = %artifact.path.display(),
                    age_ms = artifact.age().as_millis() as u64,
                    "Cleaned up artifact"
                );
            }
            DeleteOutcome::AlreadyGone => {
                tracing::debug!(artifact_id = %artifact.id, "Artifact already gone");
            }
            DeleteOutcome::GaveUp => {}
        }
        outcome
    }

    async fn stale_files(&self, max_age: Duration) -> Result<Vec<StaleFile>, ArtifactStoreError> {
        let now = SystemTime::now();
        let mut stale = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.working_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let metadata = match entry.metadata().await {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!(error = %e, path = %path.display(), "Failed to read metadata");
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }
            let modified = match metadata.modified() {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!(error = %e, path = %path.display(), "Failed to read mtime");
                    continue;
                }
            };
            let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
            if age > max_age {
                stale.push(StaleFile { path, age });
            }
        }

        Ok(stale)
    }

    async fn wipe(&self) -> Result<usize, ArtifactStoreError> {
        let mut removed = 0;
        let mut entries = tokio::fs::read_dir(&self.working_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
            if is_file && self.remove_with_retry(&entry.path()).await == DeleteOutcome::Removed {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::ResourceBusy
    ) || matches!(
        err.raw_os_error(),
        Some(ERROR_SHARING_VIOLATION) | Some(ERROR_LOCK_VIOLATION)
    )
}
