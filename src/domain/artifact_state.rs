use std::fmt;
use std::str::FromStr;

/// Lifecycle of a temporary artifact. Transitions only move forward and
/// `Deleted` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactState {
    Creating,
    Ready,
    Serving,
    Deleted,
}

impl ArtifactState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactState::Creating => "CREATING",
            ArtifactState::Ready => "READY",
            ArtifactState::Serving => "SERVING",
            ArtifactState::Deleted => "DELETED",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            ArtifactState::Creating => 0,
            ArtifactState::Ready => 1,
            ArtifactState::Serving => 2,
            ArtifactState::Deleted => 3,
        }
    }

    pub fn can_transition_to(&self, next: ArtifactState) -> bool {
        match (self, next) {
            (ArtifactState::Deleted, _) => false,
            (_, ArtifactState::Deleted) => true,
            (current, next) => next.rank() == current.rank() + 1,
        }
    }
}

impl FromStr for ArtifactState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATING" => Ok(ArtifactState::Creating),
            "READY" => Ok(ArtifactState::Ready),
            "SERVING" => Ok(ArtifactState::Serving),
            "DELETED" => Ok(ArtifactState::Deleted),
            _ => Err(format!("Invalid artifact state: {}", s)),
        }
    }
}

impl fmt::Display for ArtifactState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
