/// User domain type
use crate::types::UserId;
use serde::{Deserialize, Serialize};

/// Identity of an authenticated user, as returned by token verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Unique user identifier
    pub id: UserId,

    /// Display name
    pub username: String,

    /// Login email
    pub email: String,
}
