//! Tunebox Backend Client
//!
//! HTTP client library for the Tunebox catalog backend.
//!
//! # Features
//!
//! - **Authentication**: Login with email/password, token verification
//! - **Catalog**: List, search and fetch songs, record plays
//! - **Likes**: Toggle likes, list liked songs and IDs
//!
//! `TuneboxClient` implements `CatalogService`, `LikeService` and
//! `AuthService` from `tunebox-core`, translating its errors into
//! `TuneError` at that boundary.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tunebox_client::{ServerConfig, TuneboxClient};
//! use tunebox_likes::LikeStateSynchronizer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(TuneboxClient::new(ServerConfig::new("http://localhost:8000"))?);
//!
//!     let login = client.login("miles@example.com", "kind-of-blue").await?;
//!     let likes = LikeStateSynchronizer::new(client.clone(), login.user.id);
//!     likes.refresh().await?;
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod catalog;
mod client;
mod error;
mod http;
mod likes;
mod types;

// Re-export main types
pub use client::{CatalogClientHandle, LikesClientHandle, TuneboxClient};
pub use error::{Result, ServerClientError};
pub use types::{LikeStatus, LoginResponse, ServerConfig, DEFAULT_TIMEOUT};

// Re-export sub-clients for direct use if needed
pub use auth::AuthClient;
pub use catalog::CatalogClient;
pub use likes::LikesClient;
