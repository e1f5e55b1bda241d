use crate::error::{LikeError, Result};
use crate::state::{LikeState, Ticket};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};
use tunebox_core::{LikeService, Track, TrackId, UserId};

/// Liked-track set of one signed-in user
///
/// Reads are synchronous and reflect optimistic toggles. Toggles are
/// serialized per track: a second toggle while one is in flight fails with
/// [`LikeError::Busy`] instead of queueing. Toggles on different tracks run
/// independently.
///
/// Every toggle settles. If its future is dropped before the server answers,
/// the optimistic change is rolled back.
pub struct LikeStateSynchronizer {
    service: Arc<dyn LikeService>,
    user: UserId,
    state: RwLock<LikeState>,
}

impl LikeStateSynchronizer {
    /// Empty like state for `user`; call [`refresh`](Self::refresh) to load it
    pub fn new(service: Arc<dyn LikeService>, user: UserId) -> Self {
        Self {
            service,
            user,
            state: RwLock::new(LikeState::default()),
        }
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// Whether the user sees `track` as liked right now
    pub fn is_liked(&self, track: &TrackId) -> bool {
        self.read().is_liked(track)
    }

    /// Whether a toggle for `track` is in flight
    pub fn is_pending(&self, track: &TrackId) -> bool {
        self.read().is_pending(track)
    }

    /// Sorted snapshot of the liked view
    pub fn liked_ids(&self) -> Vec<TrackId> {
        self.read().liked_ids()
    }

    /// Flip the like on `track` and return the server's resulting state
    ///
    /// The flip is visible through [`is_liked`](Self::is_liked) before the
    /// request is sent. The server's answer replaces it when it arrives; on
    /// failure the state from before the call is restored and the error
    /// returned. Nothing is retried.
    pub async fn toggle_like(&self, track: &TrackId) -> Result<bool> {
        let Some(ticket) = self.write().begin_toggle(track) else {
            debug!(track_id = %track, "Toggle rejected: already in flight");
            return Err(LikeError::Busy(track.clone()));
        };
        debug!(track_id = %track, optimistic = ticket.optimistic, "Like toggled locally");

        let guard = InFlight {
            sync: self,
            track,
            ticket,
        };
        let result = self.service.toggle(&self.user, track).await;
        guard.disarm();

        let mut state = self.write();
        match result {
            Ok(liked) => {
                if liked != ticket.optimistic {
                    info!(track_id = %track, liked, "Server disagreed with local toggle");
                }
                if !state.settle(track, ticket, liked) {
                    debug!(track_id = %track, "Toggle settled after clear; ignored");
                }
                Ok(liked)
            }
            Err(e) => {
                warn!(track_id = %track, error = %e, "Like toggle failed; rolled back");
                state.rollback(track, ticket);
                Err(e.into())
            }
        }
    }

    /// Reload the liked set from the server
    ///
    /// Safe to call while toggles are in flight: tracks with a pending toggle
    /// or one that settled after this request went out keep their local
    /// state. A reply older than one already applied is discarded.
    pub async fn refresh(&self) -> Result<Vec<TrackId>> {
        let started = self.write().begin_refresh();

        let ids = self
            .service
            .list_liked_ids(&self.user)
            .await
            .map_err(|e| {
                warn!(user_id = %self.user, error = %e, "Failed to refresh likes");
                LikeError::from(e)
            })?;

        let count = ids.len();
        if self.write().apply_refresh(started, ids) {
            debug!(user_id = %self.user, count, "Likes refreshed");
        } else {
            debug!(user_id = %self.user, "Stale likes snapshot discarded");
        }

        Ok(self.liked_ids())
    }

    /// Full records of liked tracks in server order
    ///
    /// Also folds the returned membership in like [`refresh`](Self::refresh).
    /// Tracks the user has unliked locally in the meantime are left out.
    pub async fn liked_tracks(&self) -> Result<Vec<Track>> {
        let started = self.write().begin_refresh();
        let tracks = self.service.list_liked(&self.user).await?;

        let mut state = self.write();
        state.apply_refresh(started, tracks.iter().map(|t| t.id.clone()).collect());
        Ok(tracks
            .into_iter()
            .filter(|track| state.is_liked(&track.id))
            .collect())
    }

    /// Re-check a single track against the server
    pub async fn reconcile_track(&self, track: &TrackId) -> Result<bool> {
        let started = self.write().begin_refresh();
        let liked = self.service.is_liked(&self.user, track).await?;

        let mut state = self.write();
        if !state.apply_single(track, started, liked) {
            debug!(track_id = %track, "Newer local state kept over check");
        }
        Ok(state.is_liked(track))
    }

    /// Forget everything (logout)
    ///
    /// Toggles still in flight settle into nothing.
    pub fn clear(&self) {
        self.write().clear();
        info!(user_id = %self.user, "Like state cleared");
    }

    fn read(&self) -> RwLockReadGuard<'_, LikeState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, LikeState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Rolls a toggle back if its future is dropped mid-request
struct InFlight<'a> {
    sync: &'a LikeStateSynchronizer,
    track: &'a TrackId,
    ticket: Ticket,
}

impl InFlight<'_> {
    fn disarm(self) {
        std::mem::forget(self);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.sync.write().rollback(self.track, self.ticket) {
            debug!(track_id = %self.track, "Toggle abandoned; rolled back");
        }
    }
}
