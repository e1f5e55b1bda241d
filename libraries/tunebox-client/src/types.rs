//! Types for backend requests and responses.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tunebox_core::{TrackId, UserId, UserIdentity};

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for connecting to a backend.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Base URL of the server (e.g., "http://localhost:8000")
    pub url: String,
    /// Session token (if logged in)
    pub token: Option<String>,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl ServerConfig {
    /// Create a new server config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a config with an existing session token.
    pub fn with_token(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::new(url)
        }
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// =============================================================================
// Envelope
// =============================================================================

/// Reply wrapper used by every song and like route
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub message: Option<String>,
}

// =============================================================================
// Authentication Types
// =============================================================================

/// Request body for login endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Flat reply of the auth routes
#[derive(Debug, Deserialize)]
pub(crate) struct AuthReply {
    pub success: bool,
    pub message: Option<String>,
    pub token: Option<String>,
    pub user: Option<UserIdentity>,
}

/// Response from successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserIdentity,
}

// =============================================================================
// Like Types
// =============================================================================

/// Request body for the toggle endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ToggleRequest<'a> {
    pub user_id: &'a UserId,
    pub song_id: &'a TrackId,
}

/// Resulting like state, from toggle and check routes
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    pub is_liked: bool,
    #[serde(default)]
    pub message: Option<String>,
}
