mod ids;
mod track;
mod user;

pub use ids::{TrackId, UserId};
pub use track::{Track, TrackFilter};
pub use user::UserIdentity;
