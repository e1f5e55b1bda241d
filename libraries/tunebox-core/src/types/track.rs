/// Track domain type
use crate::types::TrackId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Catalog track
///
/// Field names follow the backend's document shape (`_id`, `filePath`,
/// `coverImage`, `playCount`), so records decode straight from the wire.
/// Everything except `play_count` is immutable from the player's side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    #[serde(rename = "_id")]
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name
    #[serde(default)]
    pub album: Option<String>,

    /// Genre
    #[serde(default)]
    pub genre: Option<String>,

    /// Duration in seconds
    #[serde(rename = "duration")]
    pub duration_secs: f64,

    /// Locator of the audio bytes, relative to the backend origin
    #[serde(rename = "filePath")]
    pub file_path: String,

    /// Locator of the cover image
    #[serde(rename = "coverImage", default)]
    pub cover_image: Option<String>,

    /// Number of recorded plays
    #[serde(rename = "playCount", default)]
    pub play_count: u64,

    /// When the track was added to the catalog
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Track {
    /// Create a new track with minimal metadata
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        duration_secs: u32,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            id: TrackId::generate(),
            title: title.into(),
            artist: artist.into(),
            album: None,
            genre: None,
            duration_secs: f64::from(duration_secs),
            file_path: file_path.into(),
            cover_image: None,
            play_count: 0,
            created_at: Some(Utc::now()),
        }
    }

    /// Replace the generated ID
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = TrackId::new(id);
        self
    }

    /// Get the track duration as a Duration
    ///
    /// Negative, non-finite or out-of-range durations read as zero.
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.duration_secs).unwrap_or(Duration::ZERO)
    }
}

/// Catalog view a queue snapshot is taken from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrackFilter {
    /// Whole catalog, server order (newest first)
    #[default]
    All,

    /// Free-text search over title/artist/album/genre
    Search(String),

    /// Most played tracks
    Popular,
}
