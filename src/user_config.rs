//! User-level configuration loaded from `~/.folio/config.toml`.
//!
//! The default file is optional; every field falls back to its `Default`
//! value, and command-line flags override whatever the file says. A file
//! named explicitly must exist and parse.
//!
//! ```toml
//! [api]
//! base_url = "https://portfolio.example.com/api"
//! timeout_secs = 30
//!
//! [cache]
//! enabled = true
//! ttl_secs = 300
//!
//! [endpoints]
//! tech-stack-categories = "techstack/categories"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::collection::{Endpoints, UnknownCollection};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum UserConfigError {
    #[error("User config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read user config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse user config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid [endpoints] entry: {0}")]
    Endpoint(#[from] UnknownCollection),
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

fn default_true() -> bool {
    true
}

/// Content API settings (`[api]` table).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL the collection endpoints hang off.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Read cache settings (`[cache]` table).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

/// Top-level user configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    /// Endpoint path overrides keyed by collection name.
    #[serde(default)]
    pub endpoints: HashMap<String, String>,
}

impl UserConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    pub fn resolved_endpoints(&self) -> Result<Endpoints, UserConfigError> {
        Ok(Endpoints::from_overrides(&self.endpoints)?)
    }
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Canonical path of the user config file (`~/.folio/config.toml`).
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".folio").join("config.toml"))
}

/// Load the user configuration from `~/.folio/config.toml`.
///
/// Returns `Ok(UserConfig::default())` if the file does not exist.
pub fn load_user_config() -> Result<UserConfig, UserConfigError> {
    match user_config_path() {
        Some(path) if path.exists() => load_user_config_from(&path),
        Some(path) => {
            debug!("User config not found at {}; using defaults", path.display());
            Ok(UserConfig::default())
        }
        None => {
            warn!("Could not determine home directory; using default config");
            Ok(UserConfig::default())
        }
    }
}

/// Load the user configuration from an explicit path.
///
/// Unlike [`load_user_config`], a missing file is an error.
pub fn load_user_config_from(path: &Path) -> Result<UserConfig, UserConfigError> {
    if !path.exists() {
        return Err(UserConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: UserConfig = toml::from_str(&content)?;
    debug!("Loaded user config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
#[path = "user_config_tests.rs"]
mod user_config_tests;
