use std::fmt;

const MAX_SOURCE_CHARS: usize = 20;

/// File name offered to the client in `Content-Disposition`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadName(String);

impl DownloadName {
    /// `{prefix}_{secure(source[..20])}.{extension}`, e.g. `tts_hello_world.mp3`.
    pub fn from_text(prefix: &str, source: &str, extension: &str) -> Self {
        let head: String = source.chars().take(MAX_SOURCE_CHARS).collect();
        let secured = secure_filename(&head);
        if secured.is_empty() {
            Self(format!("{}.{}", prefix, extension))
        } else {
            Self(format!("{}_{}.{}", prefix, secured, extension))
        }
    }

    pub fn from_raw(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DownloadName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reduces arbitrary user text to a name that is safe on any filesystem and
/// inside a quoted header value.
pub fn secure_filename(raw: &str) -> String {
    let joined = raw.split_whitespace().collect::<Vec<_>>().join("_");
    let filtered: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    filtered.trim_matches(|c| c == '.' || c == '_').to_string()
}
