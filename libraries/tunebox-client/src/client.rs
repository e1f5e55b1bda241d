//! Main Tunebox backend client.

use crate::auth::AuthClient;
use crate::catalog::CatalogClient;
use crate::error::{Result, ServerClientError};
use crate::likes::LikesClient;
use crate::types::{LoginResponse, ServerConfig};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;
use tunebox_core::{
    AuthService, CatalogService, LikeService, Track, TrackFilter, TrackId, UserId, UserIdentity,
};

/// Main client for the Tunebox backend.
///
/// Holds the base URL and the session token, and implements the core
/// service traits so the playback controller and the like synchronizer can
/// run against a live server.
///
/// # Example
///
/// ```ignore
/// use tunebox_client::{ServerConfig, TuneboxClient};
///
/// let client = TuneboxClient::new(ServerConfig::new("http://localhost:8000"))?;
/// let login = client.login("miles@example.com", "kind-of-blue").await?;
/// println!("Logged in as {}", login.user.username);
///
/// let tracks = client.catalog().await.list_tracks(&Default::default()).await?;
/// ```
#[derive(Clone)]
pub struct TuneboxClient {
    http: Client,
    config: Arc<RwLock<ServerConfig>>,
}

impl TuneboxClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self> {
        // Validate URL
        if config.url.is_empty() {
            return Err(ServerClientError::InvalidUrl("URL cannot be empty".into()));
        }

        // Parse and normalize URL
        let url = config.url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ServerClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        url::Url::parse(&url).map_err(|e| ServerClientError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Tunebox/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(RwLock::new(ServerConfig { url, ..config })),
        })
    }

    /// Get the server URL.
    pub async fn url(&self) -> String {
        self.config.read().await.url.clone()
    }

    /// Check if the client has a session token.
    pub async fn is_authenticated(&self) -> bool {
        self.config.read().await.token.is_some()
    }

    /// Login with email and password.
    ///
    /// On success, the token is stored for subsequent requests.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let url = self.url().await;
        let response = AuthClient::new(&self.http, &url)
            .login(email, password)
            .await?;

        self.config.write().await.token = Some(response.token.clone());
        Ok(response)
    }

    /// Set the token directly (e.g., from stored credentials).
    pub async fn set_token(&self, token: impl Into<String>) {
        self.config.write().await.token = Some(token.into());
    }

    /// Get the current token.
    pub async fn token(&self) -> Option<String> {
        self.config.read().await.token.clone()
    }

    /// Clear the stored token (logout).
    pub async fn logout(&self) {
        self.config.write().await.token = None;
        info!("Logged out");
    }

    /// User the stored token was issued for.
    pub async fn current_user(&self) -> Result<UserIdentity> {
        let (url, token) = self.snapshot().await;
        let token = token.ok_or(ServerClientError::AuthRequired)?;
        AuthClient::new(&self.http, &url).verify(&token).await
    }

    /// Get a catalog handle for song operations.
    pub async fn catalog(&self) -> CatalogClientHandle {
        let (url, token) = self.snapshot().await;
        CatalogClientHandle {
            http: self.http.clone(),
            url,
            token,
        }
    }

    /// Get a likes handle for like operations.
    pub async fn likes(&self) -> LikesClientHandle {
        let (url, token) = self.snapshot().await;
        LikesClientHandle {
            http: self.http.clone(),
            url,
            token,
        }
    }

    async fn snapshot(&self) -> (String, Option<String>) {
        let config = self.config.read().await;
        (config.url.clone(), config.token.clone())
    }
}

/// Handle for catalog operations.
pub struct CatalogClientHandle {
    http: Client,
    url: String,
    token: Option<String>,
}

impl CatalogClientHandle {
    /// Get the catalog client.
    pub fn client(&self) -> CatalogClient<'_> {
        CatalogClient::new(&self.http, &self.url, self.token.as_deref())
    }
}

/// Handle for like operations.
pub struct LikesClientHandle {
    http: Client,
    url: String,
    token: Option<String>,
}

impl LikesClientHandle {
    /// Get the likes client.
    pub fn client(&self) -> LikesClient<'_> {
        LikesClient::new(&self.http, &self.url, self.token.as_deref())
    }
}

// ===== Core service boundaries =====

#[async_trait]
impl CatalogService for TuneboxClient {
    async fn list_tracks(&self, filter: &TrackFilter) -> tunebox_core::Result<Vec<Track>> {
        let handle = self.catalog().await;
        Ok(handle.client().list_tracks(filter).await?)
    }

    async fn get_track(&self, id: &TrackId) -> tunebox_core::Result<Track> {
        let handle = self.catalog().await;
        Ok(handle.client().get_track(id).await?)
    }

    async fn increment_play_count(&self, id: &TrackId) -> tunebox_core::Result<Track> {
        let handle = self.catalog().await;
        Ok(handle.client().increment_play_count(id).await?)
    }
}

#[async_trait]
impl LikeService for TuneboxClient {
    async fn toggle(&self, user: &UserId, track: &TrackId) -> tunebox_core::Result<bool> {
        let handle = self.likes().await;
        Ok(handle.client().toggle(user, track).await?.is_liked)
    }

    async fn list_liked(&self, user: &UserId) -> tunebox_core::Result<Vec<Track>> {
        let handle = self.likes().await;
        Ok(handle.client().list_liked(user).await?)
    }

    async fn list_liked_ids(&self, user: &UserId) -> tunebox_core::Result<Vec<TrackId>> {
        let handle = self.likes().await;
        Ok(handle.client().list_liked_ids(user).await?)
    }

    async fn is_liked(&self, user: &UserId, track: &TrackId) -> tunebox_core::Result<bool> {
        let handle = self.likes().await;
        Ok(handle.client().check(user, track).await?)
    }
}

#[async_trait]
impl AuthService for TuneboxClient {
    async fn verify(&self, token: &str) -> tunebox_core::Result<UserIdentity> {
        let url = self.url().await;
        Ok(AuthClient::new(&self.http, &url).verify(token).await?)
    }
}
