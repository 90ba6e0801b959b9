//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\tune-bridge\config.toml
//! - macOS: ~/Library/Application Support/tune-bridge/config.toml
//! - Linux: ~/.config/tune-bridge/config.toml
//!
//! Every section has defaults, so a partial file (or none at all) is valid.
//! Command-line flags override file values at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::http::{DEFAULT_USER_AGENT, HttpSettings};
use crate::resolver::ResolverConfig;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Resolution behavior
    pub resolver: ResolverSection,

    /// Outbound HTTP settings
    pub http: HttpSection,

    /// Search backends
    pub search: SearchSection,
}

/// Resolution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSection {
    /// Two-letter storefront used when none is given
    pub default_storefront: String,

    /// Deadline for one whole resolution, in milliseconds
    pub overall_timeout_ms: u64,

    /// Extract from the album page when album-to-song lookup fails
    pub album_page_fallback: bool,
}

impl Default for ResolverSection {
    fn default() -> Self {
        Self {
            default_storefront: "us".to_string(),
            overall_timeout_ms: 8000,
            album_page_fallback: false,
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    /// Timeout for one request, in milliseconds
    pub request_timeout_ms: u64,

    /// User-Agent sent with every request
    pub user_agent: String,

    /// Accept-Language sent with every request
    pub accept_language: String,

    /// Maximum redirects followed per request
    pub max_redirects: usize,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            request_timeout_ms: 5000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "en".to_string(),
            max_redirects: 10,
        }
    }
}

/// Search backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    /// Web search engines used to find Spotify tracks, in order
    pub spotify_engines: Vec<String>,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            spotify_engines: vec![
                "duckduckgo".to_string(),
                "brave".to_string(),
                "bing".to_string(),
            ],
        }
    }
}

impl Config {
    /// Settings for [`crate::http::HttpClient`]
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            request_timeout: Duration::from_millis(self.http.request_timeout_ms),
            user_agent: self.http.user_agent.clone(),
            accept_language: self.http.accept_language.clone(),
            max_redirects: self.http.max_redirects,
        }
    }

    /// Settings for [`crate::resolver::Resolver`]
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            default_storefront: self.resolver.default_storefront.clone(),
            overall_timeout: Duration::from_millis(self.resolver.overall_timeout_ms),
            album_page_fallback: self.resolver.album_page_fallback,
            spotify_engines: self.search.spotify_engines.clone(),
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tune-bridge"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from disk
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from a specific file, with the same fallbacks as [`load`]
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::debug!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the default location
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)?;
    Ok(path)
}

/// Save configuration to a specific file
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
