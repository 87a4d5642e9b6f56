use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{
    ArtifactStore, ArtifactStoreError, ProviderError, ProviderOutput,
};
use crate::domain::Artifact;

/// An artifact that passed every check and is ready to be served.
#[derive(Debug, Clone)]
pub struct ProducedArtifact {
    pub artifact: Artifact,
    pub mime: Option<String>,
}

/// Drives an artifact from allocation to `Ready`. Whatever goes wrong on the
/// way, the artifact is deleted before the error reaches the caller.
pub struct ArtifactLifecycle {
    store: Arc<dyn ArtifactStore>,
}

impl ArtifactLifecycle {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ArtifactStore> {
        &self.store
    }

    /// Runs a provider that returns bytes and stores them as a new artifact.
    #[tracing::instrument(skip(self, fetch), fields(timeout_secs = timeout.as_secs()))]
    pub async fn produce_bytes<F>(
        &self,
        prefix: &str,
        extension_hint: &str,
        timeout: Duration,
        fetch: F,
    ) -> Result<ProducedArtifact, LifecycleError>
    where
        F: Future<Output = Result<ProviderOutput, ProviderError>> + Send,
    {
        let allocated = self.store.allocate(prefix, extension_hint).await?;
        let mut pending = PendingArtifact::new(Arc::clone(&self.store), allocated);

        let result: Result<Option<String>, LifecycleError> = async {
            let output = tokio::time::timeout(timeout, fetch)
                .await
                .map_err(|_| timed_out(prefix, timeout))??;
            let artifact = &mut pending.artifact;
            artifact.set_extension(&output.extension);
            self.store.write(artifact, &output.bytes).await?;
            self.enforce_size_limit(artifact).await?;
            Ok(Some(output.mime))
        }
        .await;

        self.settle(pending, result).await
    }

    /// Runs a provider that writes the file itself, given the artifact's
    /// path without extension, then reconciles whatever it produced.
    #[tracing::instrument(skip(self, write), fields(timeout_secs = timeout.as_secs()))]
    pub async fn produce_in_place<W, F>(
        &self,
        prefix: &str,
        timeout: Duration,
        write: W,
    ) -> Result<ProducedArtifact, LifecycleError>
    where
        W: FnOnce(PathBuf) -> F + Send,
        F: Future<Output = Result<(), ProviderError>> + Send,
    {
        let allocated = self
            .store
            .allocate(prefix, crate::domain::DEFAULT_EXTENSION)
            .await?;
        let output_stem = allocated.path.with_file_name(allocated.stem());
        let mut pending = PendingArtifact::new(Arc::clone(&self.store), allocated);

        let result: Result<Option<String>, LifecycleError> = async {
            tokio::time::timeout(timeout, write(output_stem))
                .await
                .map_err(|_| timed_out(prefix, timeout))??;
            let artifact = &mut pending.artifact;
            self.store.finalize(artifact).await?;
            self.enforce_size_limit(artifact).await?;
            Ok(None)
        }
        .await;

        self.settle(pending, result).await
    }

    /// Deletes an artifact the caller no longer needs.
    pub async fn discard(&self, artifact: &Artifact) {
        let outcome = self.store.delete(artifact).await;
        if !outcome.is_gone() {
            tracing::warn!(artifact_id = %artifact.id, "Discarded artifact left for the janitor");
        }
    }

    async fn enforce_size_limit(&self, artifact: &mut Artifact) -> Result<(), LifecycleError> {
        let check = self.store.check_size(artifact).await?;
        if check.ok {
            tracing::info!(
                artifact_id = %artifact.id,
                size_mb = format!("{:.2}", check.size_mb),
                "Artifact ready"
            );
            Ok(())
        } else {
            tracing::warn!(
                artifact_id = %artifact.id,
                size_mb = format!("{:.2}", check.size_mb),
                "Artifact exceeds size cap"
            );
            Err(LifecycleError::TooLarge {
                size_mb: check.size_mb,
            })
        }
    }

    async fn settle(
        &self,
        pending: PendingArtifact,
        result: Result<Option<String>, LifecycleError>,
    ) -> Result<ProducedArtifact, LifecycleError> {
        match result {
            Ok(mime) => Ok(ProducedArtifact {
                artifact: pending.disarm(),
                mime,
            }),
            Err(e) => {
                tracing::warn!(
                    artifact_id = %pending.artifact.id,
                    error = %e,
                    "Discarding artifact"
                );
                self.store.delete(&pending.artifact).await;
                pending.disarm();
                Err(e)
            }
        }
    }
}

/// Owns an artifact until it is handed to the caller. If the producing
/// future is dropped first, the artifact is deleted in the background.
struct PendingArtifact {
    store: Arc<dyn ArtifactStore>,
    artifact: Artifact,
    armed: bool,
}

impl PendingArtifact {
    fn new(store: Arc<dyn ArtifactStore>, artifact: Artifact) -> Self {
        Self {
            store,
            artifact,
            armed: true,
        }
    }

    fn disarm(mut self) -> Artifact {
        self.armed = false;
        self.artifact.clone()
    }
}

impl Drop for PendingArtifact {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let artifact = self.artifact.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::warn!(
                    artifact_id = %artifact.id,
                    "Production abandoned, deleting artifact"
                );
                let store = Arc::clone(&self.store);
                handle.spawn(async move {
                    store.delete(&artifact).await;
                });
            }
            Err(_) => {
                tracing::warn!(
                    artifact_id = %artifact.id,
                    "No runtime for abandoned artifact, leaving it for the janitor"
                );
            }
        }
    }
}

fn timed_out(prefix: &str, timeout: Duration) -> LifecycleError {
    LifecycleError::Provider(ProviderError::Timeout(format!(
        "{} provider exceeded {}s",
        prefix,
        timeout.as_secs()
    )))
}

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("file too large ({size_mb:.1}MB)")]
    TooLarge { size_mb: f64 },
    #[error("file not found")]
    NotFound(String),
    #[error("artifact storage: {0}")]
    Storage(ArtifactStoreError),
}

impl From<ArtifactStoreError> for LifecycleError {
    fn from(err: ArtifactStoreError) -> Self {
        match err {
            ArtifactStoreError::NotFound(what) => LifecycleError::NotFound(what),
            other => LifecycleError::Storage(other),
        }
    }
}
