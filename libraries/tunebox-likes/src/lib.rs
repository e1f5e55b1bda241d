//! Tunebox - Like State
//!
//! Keeps one user's liked-track set consistent between what the UI shows
//! and what the server has confirmed.
//!
//! - Toggles apply optimistically and are reconciled with the server's
//!   answer, which always wins
//! - Failed toggles roll back to the state from before the call
//! - At most one toggle per track is in flight; a second is rejected as busy
//! - Refreshes never clobber a track whose toggle is still pending
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tunebox_likes::LikeStateSynchronizer;
//! # use tunebox_core::{LikeService, Track, TrackId, UserId};
//! # struct Likes;
//! # #[async_trait::async_trait]
//! # impl LikeService for Likes {
//! #     async fn toggle(&self, _: &UserId, _: &TrackId) -> tunebox_core::Result<bool> { Ok(true) }
//! #     async fn list_liked(&self, _: &UserId) -> tunebox_core::Result<Vec<Track>> { Ok(vec![]) }
//! #     async fn list_liked_ids(&self, _: &UserId) -> tunebox_core::Result<Vec<TrackId>> { Ok(vec![]) }
//! # }
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//!
//! let likes = LikeStateSynchronizer::new(Arc::new(Likes), UserId::new("u1"));
//! likes.refresh().await?;
//!
//! let track = TrackId::new("64f1c2");
//! assert!(likes.toggle_like(&track).await?);
//! assert!(likes.is_liked(&track));
//! # Ok::<(), tunebox_likes::LikeError>(())
//! # }).unwrap();
//! ```

mod error;
mod state;
mod synchronizer;

// Public exports
pub use error::{LikeError, Result};
pub use state::{merge_refresh, LikeEntry};
pub use synchronizer::LikeStateSynchronizer;
