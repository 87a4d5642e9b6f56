mod local_artifact_store;

pub use local_artifact_store::{
    DEFAULT_DELETE_RETRY_DELAY, DEFAULT_MAX_SIZE_BYTES, LocalArtifactStore,
};
