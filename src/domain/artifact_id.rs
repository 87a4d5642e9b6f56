use std::fmt;

use uuid::Uuid;

/// Random, process-unique identifier embedded in every artifact file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArtifactId(Uuid);

impl ArtifactId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Recovers the id from a `{prefix}_{id}.{ext}` file name.
    pub fn parse_from_file_name(file_name: &str) -> Option<Self> {
        let stem = file_name.split('.').next()?;
        let (_, raw_id) = stem.rsplit_once('_')?;
        if raw_id.len() != 32 {
            return None;
        }
        Uuid::try_parse(raw_id).ok().map(Self)
    }
}

impl Default for ArtifactId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}
