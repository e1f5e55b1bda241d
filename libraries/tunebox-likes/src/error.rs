use thiserror::Error;
use tunebox_core::{TrackId, TuneError};

/// Errors surfaced by like toggles and refreshes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LikeError {
    #[error("Toggle already in flight for track {0}")]
    Busy(TrackId),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl LikeError {
    /// Whether the local view was rolled back because of this error
    pub fn rolled_back(&self) -> bool {
        !matches!(self, Self::Busy(_))
    }
}

impl From<TuneError> for LikeError {
    fn from(err: TuneError) -> Self {
        match err {
            TuneError::NotFound { .. } => Self::NotFound(err.to_string()),
            other => Self::Network(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, LikeError>;
