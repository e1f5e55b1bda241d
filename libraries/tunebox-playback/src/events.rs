//! Playback Events
//!
//! Two directions of traffic around the session controller:
//! - `MediaEvent`: callbacks from the media element, fed into the controller
//! - `PlaybackEvent`: state changes queued for the UI to drain
//!
//! Every load the controller requests carries a `LoadToken`. The media
//! element echoes it back on its callbacks so the controller can drop
//! callbacks that belong to a superseded selection.

use crate::types::{RepeatMode, SessionState, ShuffleMode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tunebox_core::{Track, TrackId};

/// Identifies one load request
///
/// Strictly increasing within a session; only the latest one is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadToken(u64);

impl LoadToken {
    /// Token following this one
    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Raw sequence number
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LoadToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Callbacks raised by the media element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MediaEvent {
    /// Requested track is playable and has started
    Ready {
        /// Load this callback answers
        token: LoadToken,
    },

    /// Periodic playhead report
    TimeUpdate {
        /// Load this callback answers
        token: LoadToken,
        /// Playhead position
        position: Duration,
    },

    /// Track played to its end
    Ended {
        /// Load this callback answers
        token: LoadToken,
    },

    /// Track could not be loaded or played
    Failed {
        /// Load this callback answers
        token: LoadToken,
        /// Human-readable reason from the media layer
        reason: String,
    },
}

impl MediaEvent {
    /// Load token this callback answers
    pub fn token(&self) -> LoadToken {
        match self {
            MediaEvent::Ready { token }
            | MediaEvent::TimeUpdate { token, .. }
            | MediaEvent::Ended { token }
            | MediaEvent::Failed { token, .. } => *token,
        }
    }
}

/// Events emitted by the session controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Session state changed
    StateChanged {
        /// The new state
        state: SessionState,
    },

    /// Media element should load this track from the top
    ///
    /// Also emitted for a repeat-one restart of the same track.
    LoadRequested {
        /// Token to echo back on media callbacks
        token: LoadToken,
        /// Track to load
        track: Track,
    },

    /// Current track changed
    TrackChanged {
        /// ID of the new (current) track
        track_id: TrackId,
        /// ID of the previous track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Playhead moved by a seek
    Seeked {
        /// New position
        position: Duration,
    },

    /// Server confirmed a play and returned the new count
    PlayCountUpdated {
        /// Track that was played
        track_id: TrackId,
        /// Server-side play count
        play_count: u64,
    },

    /// Repeat or shuffle changed
    ModeChanged {
        /// Current repeat mode
        repeat: RepeatMode,
        /// Current shuffle mode
        shuffle: ShuffleMode,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0-100)
        level: u8,
        /// Whether audio is muted
        is_muted: bool,
    },

    /// Queue snapshot replaced
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Playback failed; session parked in `Ended`
    Error {
        /// Error message
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_increase() {
        let first = LoadToken::default();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.value(), 1);
    }

    #[test]
    fn media_event_exposes_token() {
        let token = LoadToken::default().next().next();
        let event = MediaEvent::Failed {
            token,
            reason: "404".to_string(),
        };
        assert_eq!(event.token(), token);
    }
}
