mod artifact_lifecycle;
mod janitor;
mod search_cache;
mod search_service;
mod streaming_responder;

pub use artifact_lifecycle::{ArtifactLifecycle, LifecycleError, ProducedArtifact};
pub use janitor::{DEFAULT_MAX_AGE, DEFAULT_SWEEP_INTERVAL, Janitor, SweepReport};
pub use search_cache::{DEFAULT_SEARCH_CACHE_CAPACITY, SearchCache};
pub use search_service::SearchService;
pub use streaming_responder::{
    ArtifactStream, DEFAULT_CHUNK_SIZE, DEFAULT_CLEANUP_GRACE, StreamingResponder,
};
