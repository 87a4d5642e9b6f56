use std::io;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::stream::BoxStream;
use tokio::io::AsyncReadExt;
use tokio::sync::oneshot;

use crate::application::ports::{ArtifactStore, ArtifactStoreError, DeleteOutcome};
use crate::domain::{Artifact, ArtifactId, DownloadName};

pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;
pub const DEFAULT_CLEANUP_GRACE: Duration = Duration::from_millis(500);

/// A finished artifact on its way to the client.
pub struct ArtifactStream {
    pub artifact_id: ArtifactId,
    pub mime: String,
    pub download_name: DownloadName,
    pub content_length: u64,
    pub body: BoxStream<'static, Result<Bytes, io::Error>>,
    /// Resolves once the artifact has been deleted.
    pub cleanup: oneshot::Receiver<DeleteOutcome>,
}

/// Serves artifacts in fixed-size chunks and deletes each one exactly once,
/// after the body is fully sent or dropped, whichever comes first.
pub struct StreamingResponder {
    store: Arc<dyn ArtifactStore>,
    chunk_size: usize,
    cleanup_grace: Duration,
}

impl StreamingResponder {
    pub fn new(store: Arc<dyn ArtifactStore>, chunk_size: usize, cleanup_grace: Duration) -> Self {
        Self {
            store,
            chunk_size: chunk_size.max(1),
            cleanup_grace,
        }
    }

    pub fn with_defaults(store: Arc<dyn ArtifactStore>) -> Self {
        Self::new(store, DEFAULT_CHUNK_SIZE, DEFAULT_CLEANUP_GRACE)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Takes ownership of the artifact's deletion. If serving cannot start,
    /// the artifact is still cleaned up.
    pub async fn serve(
        &self,
        mut artifact: Artifact,
        mime: &str,
        download_name: DownloadName,
    ) -> Result<ArtifactStream, ArtifactStoreError> {
        let (done_tx, done_rx) = oneshot::channel();
        let guard = CleanupGuard {
            store: Arc::clone(&self.store),
            artifact: Some(artifact.clone()),
            grace: self.cleanup_grace,
            done: Some(done_tx),
        };

        self.store.mark_serving(&mut artifact).await?;
        let file = tokio::fs::File::open(&artifact.path).await?;
        let content_length = file.metadata().await?.len();

        tracing::debug!(
            artifact_id = %artifact.id,
            bytes = content_length,
            download_name = %download_name,
            "Streaming artifact"
        );

        Ok(ArtifactStream {
            artifact_id: artifact.id,
            mime: mime.to_string(),
            download_name,
            content_length,
            body: chunked(file, self.chunk_size, guard),
            cleanup: done_rx,
        })
    }
}

fn chunked(
    mut file: tokio::fs::File,
    chunk_size: usize,
    guard: CleanupGuard,
) -> BoxStream<'static, Result<Bytes, io::Error>> {
    Box::pin(async_stream::try_stream! {
        let _guard = guard;
        loop {
            let mut chunk = vec![0u8; chunk_size];
            let mut filled = 0;
            while filled < chunk_size {
                let read = file.read(&mut chunk[filled..]).await?;
                if read == 0 {
                    break;
                }
                filled += read;
            }
            if filled == 0 {
                break;
            }
            chunk.truncate(filled);
            yield Bytes::from(chunk);
            if filled < chunk_size {
                break;
            }
        }
    })
}

/// Deletes the artifact when dropped. Dropping happens exactly once, whether
/// the stream finished, failed, or the client went away.
struct CleanupGuard {
    store: Arc<dyn ArtifactStore>,
    artifact: Option<Artifact>,
    grace: Duration,
    done: Option<oneshot::Sender<DeleteOutcome>>,
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let Some(artifact) = self.artifact.take() else {
            return;
        };
        let store = Arc::clone(&self.store);
        let grace = self.grace;
        let done = self.done.take();

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if !grace.is_zero() {
                        tokio::time::sleep(grace).await;
                    }
                    let outcome = store.delete(&artifact).await;
                    if let Some(done) = done {
                        let _ = done.send(outcome);
                    }
                });
            }
            Err(_) => {
                tracing::warn!(
                    artifact_id = %artifact.id,
                    "No runtime for async cleanup, deleting inline"
                );
                let outcome = match std::fs::remove_file(&artifact.path) {
                    Ok(()) => DeleteOutcome::Removed,
                    Err(e) if e.kind() == io::ErrorKind::NotFound => DeleteOutcome::AlreadyGone,
                    Err(_) => DeleteOutcome::GaveUp,
                };
                if let Some(done) = done {
                    let _ = done.send(outcome);
                }
            }
        }
    }
}
