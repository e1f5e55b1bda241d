//! Error types for playback management

use thiserror::Error;
use tunebox_core::TrackId;

/// Playback errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlaybackError {
    /// No track is currently selected
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Queue is empty
    #[error("Queue is empty")]
    QueueEmpty,

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// Track is not part of the current queue snapshot
    #[error("Track not in queue: {0}")]
    TrackNotInQueue(TrackId),

    /// Operation not valid in the current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Audio resource failed to become playable
    #[error("Media failed to load: {0}")]
    MediaLoad(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
