use bytes::Bytes;

/// Bytes produced by a remote content provider.
#[derive(Debug, Clone)]
pub struct ProviderOutput {
    pub bytes: Bytes,
    pub extension: String,
    pub mime: String,
}

impl ProviderOutput {
    pub fn new(bytes: impl Into<Bytes>, extension: &str, mime: &str) -> Self {
        Self {
            bytes: bytes.into(),
            extension: extension.to_string(),
            mime: mime.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{0} API key not configured")]
    NotConfigured(String),
    #[error("remote failure: {0}")]
    RemoteFailure(String),
    #[error("timed out: {0}")]
    Timeout(String),
    #[error("{0}")]
    InvalidInput(String),
}

impl ProviderError {
    /// Classifies a transport error, keeping timeouts distinguishable.
    pub fn from_reqwest(context: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(format!("{}: {}", context, err))
        } else {
            ProviderError::RemoteFailure(format!("{}: {}", context, err))
        }
    }
}
