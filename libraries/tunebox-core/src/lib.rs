//! Tunebox Core
//!
//! Domain types, error handling and service boundaries shared by every
//! Tunebox crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackId`, `UserId`, `UserIdentity`, `TrackFilter`
//! - **Service Traits**: `CatalogService`, `AuthService`, `LikeService`
//! - **Error Handling**: Unified `TuneError` and `Result` types
//!
//! Playback and like-state logic only ever talk to the backend through the
//! service traits, so tests and alternative transports can plug in their own
//! implementations.
//!
//! # Example
//!
//! ```rust
//! use tunebox_core::types::{Track, TrackId};
//!
//! let track = Track::new("Blue in Green", "Miles Davis", 337, "/uploads/blue.mp3");
//! assert_eq!(track.play_count, 0);
//! assert_ne!(track.id, TrackId::new(""));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, TuneError};
pub use traits::{AuthService, CatalogService, LikeService};

pub use types::{Track, TrackFilter, TrackId, UserId, UserIdentity};
