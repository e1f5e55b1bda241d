//! Backend identifiers
//!
//! The backend hands out opaque string IDs (document-store object IDs). They
//! are compared and hashed as-is and never parsed.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an ID issued by the backend
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Raw ID as sent on the wire
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }
    };
}

string_id! {
    /// Signed-in user
    UserId
}

string_id! {
    /// Catalog track
    ///
    /// Opaque and stable; unique within a catalog.
    TrackId
}

impl TrackId {
    /// Fresh local ID for a track the backend has not seen yet
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}
