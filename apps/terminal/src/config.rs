//! # Terminal Configuration
//!
//! Configuration for the sale screen binary.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --base-url http://192.168.1.10:5000                                │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     CAJA_BASE_URL=http://192.168.1.10:5000                             │
//! │     CAJA_DEBOUNCE_MS=300                                               │
//! │     CAJA_REQUEST_TIMEOUT_SECS=10                                       │
//! │     CAJA_ALERT_SECS=5                                                  │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config path, or                                                  │
//! │     ~/.config/caja-pos/caja.toml (Linux)                               │
//! │     ~/Library/Application Support/py.caja.pos/caja.toml (macOS)        │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [catalog]
//! base_url = "http://127.0.0.1:5000"
//! debounce_ms = 300
//! request_timeout_secs = 10
//!
//! [display]
//! alert_secs = 5
//! show_words = true
//! ```

use caja_catalog::{CatalogConfig, CatalogError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {reason}")]
    LoadFailed { path: PathBuf, reason: String },

    #[error("Invalid display configuration: {0}")]
    InvalidDisplay(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

// =============================================================================
// Display Settings
// =============================================================================

fn default_alert_secs() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

/// How the screen presents feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Lifetime of error and success alerts. Warnings and info stay until
    /// dismissed.
    #[serde(default = "default_alert_secs")]
    pub alert_secs: u64,

    /// Show the total in words under the amount.
    #[serde(default = "default_true")]
    pub show_words: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            alert_secs: default_alert_secs(),
            show_words: true,
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete terminal configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub display: DisplaySettings,
}

impl PosConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (caja.toml); a missing file is not an error
    /// 3. Environment variables
    ///
    /// Flags are applied by the caller, which then calls [`validate`].
    ///
    /// [`validate`]: PosConfig::validate
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() => {
                info!(?path, "Loading config from file");
                Self::from_file(&path)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |reason: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            reason,
        };

        let contents = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
        toml::from_str(&contents).map_err(|e| load_failed(e.to_string()))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.catalog.validate()?;

        if self.display.alert_secs == 0 {
            return Err(ConfigError::InvalidDisplay(
                "alert_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `CAJA_*` overrides read through `lookup`.
    ///
    /// Unparseable numbers are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CAJA_BASE_URL") {
            debug!(url = %url, "Overriding catalog URL from environment");
            self.catalog.base_url = url;
        }

        if let Some(value) = lookup("CAJA_DEBOUNCE_MS") {
            match value.parse() {
                Ok(ms) => self.catalog.debounce_ms = ms,
                Err(_) => warn!(value = %value, "Ignoring invalid CAJA_DEBOUNCE_MS"),
            }
        }

        if let Some(value) = lookup("CAJA_REQUEST_TIMEOUT_SECS") {
            match value.parse() {
                Ok(secs) => self.catalog.request_timeout_secs = secs,
                Err(_) => warn!(value = %value, "Ignoring invalid CAJA_REQUEST_TIMEOUT_SECS"),
            }
        }

        if let Some(value) = lookup("CAJA_ALERT_SECS") {
            match value.parse() {
                Ok(secs) => self.display.alert_secs = secs,
                Err(_) => warn!(value = %value, "Ignoring invalid CAJA_ALERT_SECS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("py", "caja", "pos")
            .map(|dirs| dirs.config_dir().join("caja.toml"))
    }
}
