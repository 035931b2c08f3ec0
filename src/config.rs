//! Configuration management for setlistify.
//!
//! This module handles loading configuration values from environment variables
//! and a `.env` file. It provides a single [`Config`] value holding the Spotify
//! application credentials, the setlist.fm API key, and the endpoints the
//! clients talk to.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (endpoints and scope only)
//!
//! Missing credentials are fatal for the application but reported as a
//! [`ConfigError`] here; the command-line layer decides how to exit.

use std::{env, path::PathBuf};

use reqwest::Url;
use thiserror::Error;

pub const DEFAULT_SCOPE: &str = "user-read-private playlist-modify-public";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com";
pub const DEFAULT_SETLIST_FM_URL: &str = "https://api.setlist.fm";
pub const DEFAULT_CALLBACK_PORT: u16 = 8080;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} is not a valid URL: {reason}")]
    InvalidUrl { key: &'static str, reason: String },
    #[error("cannot prepare configuration directory: {0}")]
    Directory(String),
}

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub setlist_api_key: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub setlist_fm_url: String,
    pub token_path: PathBuf,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary key lookup.
    ///
    /// Empty values count as missing. Endpoint overrides and the scope fall
    /// back to the Spotify and setlist.fm defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let redirect_uri = require("SPOTIFY_REDIRECT_URI")?;
        Url::parse(&redirect_uri).map_err(|e| ConfigError::InvalidUrl {
            key: "SPOTIFY_REDIRECT_URI",
            reason: e.to_string(),
        })?;

        Ok(Self {
            client_id: require("SPOTIFY_CLIENT_ID")?,
            client_secret: require("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri,
            scope: get("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            setlist_api_key: require("SETLIST_FM_API_KEY")?,
            auth_url: get("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: get("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            api_url: get("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            setlist_fm_url: get("SETLIST_FM_API_URL")
                .unwrap_or_else(|| DEFAULT_SETLIST_FM_URL.to_string()),
            token_path: get("SETLISTIFY_TOKEN_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_token_path),
        })
    }

    /// Port the local redirect receiver binds to.
    ///
    /// Taken from the redirect URI; a URI without an explicit port uses
    /// [`DEFAULT_CALLBACK_PORT`].
    pub fn callback_port(&self) -> u16 {
        Url::parse(&self.redirect_uri)
            .ok()
            .and_then(|url| url.port())
            .unwrap_or(DEFAULT_CALLBACK_PORT)
    }
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the directory structure if it doesn't exist and loads variables from
/// `setlistify/.env` under the platform-specific local data directory:
/// - Linux: `~/.local/share/setlistify/.env`
/// - macOS: `~/Library/Application Support/setlistify/.env`
/// - Windows: `%LOCALAPPDATA%/setlistify/.env`
///
/// A missing `.env` file is fine: every value may come from the process
/// environment instead. Variables already set in the environment win.
pub async fn load_env() -> Result<(), ConfigError> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| ConfigError::Directory(e.to_string()))?;
    }

    if path.is_file() {
        // dotenv never overrides variables that are already set
        let _ = dotenv::from_path(&path);
    }
    Ok(())
}

/// Returns the application directory inside the local data directory.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("setlistify");
    path
}

fn default_token_path() -> PathBuf {
    data_dir().join("cache/token.json")
}
