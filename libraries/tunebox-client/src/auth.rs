//! Authentication routes.

use crate::error::{Result, ServerClientError};
use crate::http::{endpoint, send};
use crate::types::{AuthReply, LoginRequest, LoginResponse};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, info, warn};
use tunebox_core::UserIdentity;

/// Authentication client for the auth routes.
pub struct AuthClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Login with email and password.
    ///
    /// Returns the session token on success.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let url = endpoint(self.base_url, &["api", "auth", "login"])?;
        debug!(url = %url, email = %email, "Attempting login");

        let response = send(self.http.post(url).json(&LoginRequest { email, password })).await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::BAD_REQUEST {
            let reply = read_reply(response).await.ok();
            let message = reply
                .and_then(|r| r.message)
                .unwrap_or_else(|| "Invalid email or password".to_string());
            warn!(status = %status, error = %message, "Login failed");
            return Err(ServerClientError::AuthFailed(message));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServerClientError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let reply = read_reply(response).await?;
        if !reply.success {
            return Err(ServerClientError::AuthFailed(
                reply.message.unwrap_or_else(|| "Login refused".to_string()),
            ));
        }
        let (Some(token), Some(user)) = (reply.token, reply.user) else {
            return Err(ServerClientError::ParseError(
                "login reply missing token or user".to_string(),
            ));
        };

        info!(user_id = %user.id, username = %user.username, "Login successful");
        Ok(LoginResponse { token, user })
    }

    /// Resolve a session token to its user.
    pub async fn verify(&self, token: &str) -> Result<UserIdentity> {
        let url = endpoint(self.base_url, &["api", "auth", "verify"])?;
        debug!(url = %url, "Verifying session token");

        let response = send(self.http.get(url).bearer_auth(token)).await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ServerClientError::AuthRequired);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServerClientError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let reply = read_reply(response).await?;
        match reply.user {
            Some(user) if reply.success => Ok(user),
            _ => Err(ServerClientError::AuthRequired),
        }
    }
}

async fn read_reply(response: Response) -> Result<AuthReply> {
    response
        .json()
        .await
        .map_err(|e| ServerClientError::ParseError(format!("Failed to parse auth reply: {}", e)))
}
