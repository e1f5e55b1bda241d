//! Song catalog routes.

use crate::error::Result;
use crate::http::{authorize, decode, endpoint, send};
use reqwest::Client;
use tracing::debug;
use tunebox_core::{Track, TrackFilter, TrackId};

/// Catalog client for the song routes.
pub struct CatalogClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    token: Option<&'a str>,
}

impl<'a> CatalogClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, token: Option<&'a str>) -> Self {
        Self {
            http,
            base_url,
            token,
        }
    }

    /// Tracks for a catalog view, in server order.
    pub async fn list_tracks(&self, filter: &TrackFilter) -> Result<Vec<Track>> {
        let url = match filter {
            TrackFilter::All => endpoint(self.base_url, &["api", "songs"])?,
            TrackFilter::Search(query) => {
                endpoint(self.base_url, &["api", "songs", "search", query.as_str()])?
            }
            TrackFilter::Popular => endpoint(self.base_url, &["api", "songs", "popular", "top"])?,
        };
        debug!(url = %url, filter = ?filter, "Fetching tracks");

        let response = send(authorize(self.http.get(url), self.token)).await?;
        let tracks: Vec<Track> = decode(response, "").await?;

        debug!(count = tracks.len(), "Fetched tracks");
        Ok(tracks)
    }

    /// Get a single track by ID.
    pub async fn get_track(&self, id: &TrackId) -> Result<Track> {
        let url = endpoint(self.base_url, &["api", "songs", id.as_str()])?;
        debug!(url = %url, track_id = %id, "Fetching track");

        let response = send(authorize(self.http.get(url), self.token)).await?;
        decode(response, id.as_str()).await
    }

    /// Add one play to a track and return the updated record.
    pub async fn increment_play_count(&self, id: &TrackId) -> Result<Track> {
        let url = endpoint(self.base_url, &["api", "songs", id.as_str(), "play"])?;
        debug!(url = %url, track_id = %id, "Recording play");

        let response = send(authorize(self.http.patch(url), self.token)).await?;
        let track: Track = decode(response, id.as_str()).await?;

        debug!(track_id = %track.id, play_count = track.play_count, "Play recorded");
        Ok(track)
    }
}
