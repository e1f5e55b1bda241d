/// Service boundaries consumed by the player
use crate::error::Result;
use crate::types::{Track, TrackFilter, TrackId, UserId, UserIdentity};
use async_trait::async_trait;

/// Read access to the track catalog plus the play-count mutation
///
/// Implementations must be cheap to share: the playback controller holds one
/// behind an `Arc` and calls it from background tasks.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// List tracks for a catalog view
    ///
    /// Order is defined by the server (newest first for `TrackFilter::All`).
    /// Callers treat the result as a snapshot.
    async fn list_tracks(&self, filter: &TrackFilter) -> Result<Vec<Track>>;

    /// Get a single track
    async fn get_track(&self, id: &TrackId) -> Result<Track>;

    /// Record one play of a track and return the updated record
    ///
    /// Each call adds exactly one play. Fails with `TuneError::NotFound`
    /// when the track no longer exists.
    async fn increment_play_count(&self, id: &TrackId) -> Result<Track>;
}

/// Token verification
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a session token to the user it was issued for
    ///
    /// Fails with `TuneError::Unauthorized` for invalid or expired tokens.
    async fn verify(&self, token: &str) -> Result<UserIdentity>;
}

/// Remote like relation between users and tracks
#[async_trait]
pub trait LikeService: Send + Sync {
    /// Flip membership server-side and return the resulting state
    ///
    /// The return value is the new state, not a delta.
    async fn toggle(&self, user: &UserId, track: &TrackId) -> Result<bool>;

    /// Full records of every liked track, in server order
    async fn list_liked(&self, user: &UserId) -> Result<Vec<Track>>;

    /// IDs of every liked track, for membership checks
    async fn list_liked_ids(&self, user: &UserId) -> Result<Vec<TrackId>>;

    /// Whether a single track is liked
    async fn is_liked(&self, user: &UserId, track: &TrackId) -> Result<bool> {
        Ok(self.list_liked_ids(user).await?.contains(track))
    }
}
