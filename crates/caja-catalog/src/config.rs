//! # Catalog Configuration
//!
//! The `[catalog]` section of the terminal's `caja.toml`.
//!
//! ## Configuration File Format
//! ```toml
//! [catalog]
//! base_url = "http://127.0.0.1:5000"
//! suggestions_path = "/inventario/sugerencias"
//! lookup_path = "/ventas/buscar"
//! search_path = "/ventas/productos/buscar"
//! debounce_ms = 300
//! request_timeout_secs = 10
//! ```
//!
//! Loading (file, environment overrides) is done by the binary; this module
//! only owns the shape, the defaults and [`CatalogConfig::validate`].

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::error::{CatalogError, CatalogResult};

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_suggestions_path() -> String {
    "/inventario/sugerencias".to_string()
}

fn default_lookup_path() -> String {
    "/ventas/buscar".to_string()
}

fn default_search_path() -> String {
    "/ventas/productos/buscar".to_string()
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_request_timeout() -> u64 {
    10
}

/// Where the catalog lives and how eagerly the screen queries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Inventory server root, e.g. `http://127.0.0.1:5000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Autocomplete endpoint, queried with `?q=`.
    #[serde(default = "default_suggestions_path")]
    pub suggestions_path: String,

    /// Barcode lookup endpoint, the code is appended as a path segment.
    #[serde(default = "default_lookup_path")]
    pub lookup_path: String,

    /// Name search endpoint used by the search modal, queried with `?q=`.
    #[serde(default = "default_search_path")]
    pub search_path: String,

    /// Quiet period before an autocomplete or modal search fires.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            base_url: default_base_url(),
            suggestions_path: default_suggestions_path(),
            lookup_path: default_lookup_path(),
            search_path: default_search_path(),
            debounce_ms: default_debounce_ms(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl CatalogConfig {
    /// Validates the section.
    ///
    /// ## Rules
    /// - `base_url` parses and uses http or https
    /// - every path starts with `/`
    /// - `debounce_ms` and `request_timeout_secs` are non-zero
    pub fn validate(&self) -> CatalogResult<()> {
        let url = Url::parse(&self.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(CatalogError::InvalidUrl(format!(
                "Catalog URL must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        for (name, path) in [
            ("suggestions_path", &self.suggestions_path),
            ("lookup_path", &self.lookup_path),
            ("search_path", &self.search_path),
        ] {
            if !path.starts_with('/') {
                return Err(CatalogError::InvalidConfig(format!(
                    "{} must start with '/', got: {}",
                    name, path
                )));
            }
        }

        if self.debounce_ms == 0 {
            return Err(CatalogError::InvalidConfig(
                "debounce_ms must be greater than 0".into(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(CatalogError::InvalidConfig(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CatalogConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.lookup_path, "/ventas/buscar");
    }

    #[test]
    fn test_config_validation() {
        let mut config = CatalogConfig::default();

        config.base_url = "ftp://inventario.local".to_string();
        assert!(matches!(
            config.validate(),
            Err(CatalogError::InvalidUrl(_))
        ));

        config.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.base_url = "https://inventario.local".to_string();
        assert!(config.validate().is_ok());

        config.search_path = "ventas/productos/buscar".to_string();
        assert!(matches!(
            config.validate(),
            Err(CatalogError::InvalidConfig(_))
        ));

        config.search_path = default_search_path();
        config.debounce_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: CatalogConfig = toml::from_str("debounce_ms = 150").unwrap();
        assert_eq!(config.debounce_ms, 150);
        assert_eq!(config.base_url, default_base_url());
        assert_eq!(config.request_timeout_secs, 10);
    }
}
