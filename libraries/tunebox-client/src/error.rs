//! Error types for the Tunebox backend client.

use thiserror::Error;
use tunebox_core::TuneError;

/// Errors that can occur when talking to the backend.
#[derive(Error, Debug)]
pub enum ServerClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with an error status and no usable envelope
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Server answered `success: false`
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Referenced song or user does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Authentication required but no token available, or token refused
    #[error("Authentication required")]
    AuthRequired,

    /// Login refused
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

impl ServerClientError {
    /// Classify a failure to send a request
    pub(crate) fn from_send(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            Self::ServerUnreachable(e.to_string())
        } else {
            Self::Request(e)
        }
    }

    /// Turn a `success: false` message into an error
    ///
    /// The backend reports missing entities as "<Entity> not found" inside a
    /// normal rejection; those become `NotFound` for `id`.
    pub(crate) fn rejection(message: String, id: &str) -> Self {
        let lower = message.to_ascii_lowercase();
        match lower.find("not found") {
            Some(pos) => {
                let entity = message.get(..pos).map_or("", str::trim);
                Self::NotFound {
                    entity: if entity.is_empty() {
                        "Resource".to_string()
                    } else {
                        entity.to_string()
                    },
                    id: id.to_string(),
                }
            }
            None => Self::Rejected(message),
        }
    }
}

impl From<ServerClientError> for TuneError {
    fn from(err: ServerClientError) -> Self {
        match err {
            ServerClientError::NotFound { entity, id } => TuneError::NotFound { entity, id },
            ServerClientError::AuthRequired => TuneError::unauthorized("authentication required"),
            ServerClientError::AuthFailed(msg) => TuneError::Unauthorized(msg),
            ServerClientError::InvalidUrl(msg) => TuneError::InvalidInput(msg),
            ServerClientError::Rejected(msg) => TuneError::Other(msg),
            err @ (ServerClientError::Request(_)
            | ServerClientError::ServerError { .. }
            | ServerClientError::ParseError(_)
            | ServerClientError::ServerUnreachable(_)) => TuneError::Network(err.to_string()),
        }
    }
}

/// Result type for backend client operations.
pub type Result<T> = std::result::Result<T, ServerClientError>;
