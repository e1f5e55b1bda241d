//! CLI configuration
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tunebox_client::ServerConfig;
use tunebox_playback::PlaybackConfig;

/// Default config file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "tunebox.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Config file not found: {0}")]
    Missing(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthSettings {
    /// Session token from `tunebox login`
    #[serde(default)]
    pub token: Option<String>,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; the default file is optional.
    /// Environment variables override the file: `TUNEBOX_SERVER__URL`,
    /// `TUNEBOX_AUTH__TOKEN`, `TUNEBOX_PLAYBACK__REPEAT`, ...
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) if !path.exists() => return Err(ConfigError::Missing(path.to_path_buf())),
            Some(path) => {
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (prefixed with TUNEBOX_)
        settings = settings.add_source(
            config::Environment::with_prefix("TUNEBOX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "server URL is required (set TUNEBOX_SERVER__URL)".to_string(),
            ));
        }

        if self.server.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "server.timeout_secs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Connection settings for the backend client
    pub fn server_config(&self) -> ServerConfig {
        let config = match &self.auth.token {
            Some(token) => ServerConfig::with_token(&self.server.url, token),
            None => ServerConfig::new(&self.server.url),
        };
        config.timeout(Duration::from_secs(self.server.timeout_secs))
    }
}

// Default values
fn default_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
