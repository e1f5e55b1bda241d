//! Tunebox - Playback Session Control
//!
//! Client-local playback session management.
//!
//! This crate provides:
//! - Queue traversal decisions (next, previous, end of track)
//! - Repeat modes (None, One, All) and random shuffle
//! - A session state machine driven by transport calls and media callbacks
//! - Load tokens that discard callbacks from superseded selections
//! - Background play-count reporting through `CatalogService`
//! - Volume control (0-100%, mute toggle)
//!
//! # Architecture
//!
//! `tunebox-playback` never touches audio itself. The host (a browser media
//! element, a terminal front-end, a test) loads whatever `LoadRequested`
//! names and reports back with `MediaEvent`s carrying the same token.
//!
//! # Example: Basic Session
//!
//! ```rust
//! use std::sync::Arc;
//! use tunebox_playback::{MediaEvent, PlaybackConfig, PlaybackSessionController, SessionState};
//! # use tunebox_core::{CatalogService, Track, TrackFilter, TrackId, TuneError};
//! # struct Catalog;
//! # #[async_trait::async_trait]
//! # impl CatalogService for Catalog {
//! #     async fn list_tracks(&self, _: &TrackFilter) -> tunebox_core::Result<Vec<Track>> { Ok(vec![]) }
//! #     async fn get_track(&self, id: &TrackId) -> tunebox_core::Result<Track> { Err(TuneError::not_found("Track", id.as_str())) }
//! #     async fn increment_play_count(&self, id: &TrackId) -> tunebox_core::Result<Track> { Err(TuneError::not_found("Track", id.as_str())) }
//! # }
//!
//! let mut controller = PlaybackSessionController::new(Arc::new(Catalog), PlaybackConfig::default());
//! controller.load_queue(vec![
//!     Track::new("So What", "Miles Davis", 562, "/uploads/so-what.mp3"),
//!     Track::new("Freddie Freeloader", "Miles Davis", 589, "/uploads/freddie.mp3"),
//! ]);
//!
//! let token = controller.select_index(0).unwrap();
//! assert_eq!(controller.state(), SessionState::Loading);
//!
//! // The media element reports the track playable
//! controller.handle_media_event(MediaEvent::Ready { token });
//! assert_eq!(controller.state(), SessionState::Playing);
//!
//! controller.pause();
//! assert_eq!(controller.state(), SessionState::Paused);
//! ```

mod controller;
mod error;
pub mod events;
pub mod queue;
pub mod types;
mod volume;

// Public exports
pub use controller::PlaybackSessionController;
pub use error::{PlaybackError, Result};
pub use events::{LoadToken, MediaEvent, PlaybackEvent};
pub use queue::{EndAction, Step};
pub use types::{PlaybackConfig, RepeatMode, SessionState, ShuffleMode, Transport};
