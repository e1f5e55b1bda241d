//! Like routes.

use crate::error::Result;
use crate::http::{authorize, decode, endpoint, send};
use crate::types::{LikeStatus, ToggleRequest};
use reqwest::Client;
use tracing::debug;
use tunebox_core::{Track, TrackId, UserId};

/// Like client for the like routes.
pub struct LikesClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    token: Option<&'a str>,
}

impl<'a> LikesClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, token: Option<&'a str>) -> Self {
        Self {
            http,
            base_url,
            token,
        }
    }

    /// Flip the like server-side; the reply is the resulting state.
    pub async fn toggle(&self, user: &UserId, track: &TrackId) -> Result<LikeStatus> {
        let url = endpoint(self.base_url, &["api", "likes", "toggle"])?;
        debug!(url = %url, user_id = %user, track_id = %track, "Toggling like");

        let request = self.http.post(url).json(&ToggleRequest {
            user_id: user,
            song_id: track,
        });
        let response = send(authorize(request, self.token)).await?;
        let status: LikeStatus = decode(response, track.as_str()).await?;

        debug!(track_id = %track, is_liked = status.is_liked, "Like toggled");
        Ok(status)
    }

    /// Full records of the user's liked tracks.
    pub async fn list_liked(&self, user: &UserId) -> Result<Vec<Track>> {
        let url = endpoint(self.base_url, &["api", "likes", "user", user.as_str()])?;
        debug!(url = %url, user_id = %user, "Fetching liked tracks");

        let response = send(authorize(self.http.get(url), self.token)).await?;
        decode(response, user.as_str()).await
    }

    /// IDs of the user's liked tracks.
    pub async fn list_liked_ids(&self, user: &UserId) -> Result<Vec<TrackId>> {
        let url = endpoint(self.base_url, &["api", "likes", "ids", user.as_str()])?;
        debug!(url = %url, user_id = %user, "Fetching liked track IDs");

        let response = send(authorize(self.http.get(url), self.token)).await?;
        decode(response, user.as_str()).await
    }

    /// Whether one track is liked.
    pub async fn check(&self, user: &UserId, track: &TrackId) -> Result<bool> {
        let url = endpoint(
            self.base_url,
            &["api", "likes", "check", user.as_str(), track.as_str()],
        )?;
        debug!(url = %url, user_id = %user, track_id = %track, "Checking like");

        let response = send(authorize(self.http.get(url), self.token)).await?;
        let status: LikeStatus = decode(response, track.as_str()).await?;
        Ok(status.is_liked)
    }
}
