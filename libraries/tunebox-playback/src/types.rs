//! Core types for playback management

use serde::{Deserialize, Serialize};

/// Session state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Nothing selected
    Idle,

    /// Waiting for the media element to report the selected track playable
    Loading,

    /// Currently playing
    Playing,

    /// Paused mid-track, or parked after the queue ran out
    Paused,

    /// Parked after a media failure
    Ended,
}

impl SessionState {
    /// Transport as the UI sees it
    pub fn transport(self) -> Transport {
        match self {
            SessionState::Playing => Transport::Playing,
            _ => Transport::Paused,
        }
    }
}

/// Transport state shown on the play/pause button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transport {
    /// Audio is sounding
    Playing,

    /// Audio is silent
    Paused,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the queue ends
    #[default]
    #[serde(rename = "none", alias = "off")]
    Off,

    /// Loop the current track only
    One,

    /// Loop the entire queue
    All,
}

impl RepeatMode {
    /// Next mode in button order: none → all → one → none
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

/// Shuffle mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShuffleMode {
    /// Linear traversal
    #[default]
    Off,

    /// Uniformly random pick on every step
    On,
}

impl ShuffleMode {
    /// Flip between off and on
    pub fn toggled(self) -> Self {
        match self {
            ShuffleMode::Off => ShuffleMode::On,
            ShuffleMode::On => ShuffleMode::Off,
        }
    }

    /// Whether random traversal is active
    pub fn is_on(self) -> bool {
        self == ShuffleMode::On
    }
}

/// Configuration for a playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial repeat mode (default: none)
    pub repeat: RepeatMode,

    /// Initial shuffle mode (default: off)
    pub shuffle: ShuffleMode,

    /// Initial volume (0-100, default: 40)
    pub volume: u8,

    /// Fixed seed for shuffle picks; entropy-seeded when absent
    pub shuffle_seed: Option<u64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            repeat: RepeatMode::Off,
            shuffle: ShuffleMode::Off,
            volume: 40,
            shuffle_seed: None,
        }
    }
}
