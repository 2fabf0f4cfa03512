//! # Storefront Configuration
//!
//! Configuration for the state layer: where the backend lives, which
//! currency symbol to display, and where the catalog comes from.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOREFRONT_BACKEND_URL=https://api.example.com                     │
//! │     STOREFRONT_CURRENCY=€                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:4000, "$", live catalog                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "https://api.example.com"
//! timeout_secs = 30
//!
//! [display]
//! currency = "$"
//!
//! [catalog]
//! source = "live"          # live | fixture
//! fixture_path = "products.json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Catalog Source
// =============================================================================

/// Where the product catalog is loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSource {
    /// `GET /api/product/list` on the backend.
    #[default]
    Live,

    /// A fixed product list; no network traffic for the catalog.
    Fixture,
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::Live => write!(f, "live"),
            CatalogSource::Fixture => write!(f, "fixture"),
        }
    }
}

impl std::str::FromStr for CatalogSource {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "live" | "api" | "remote" => Ok(CatalogSource::Live),
            "fixture" | "static" | "dummy" => Ok(CatalogSource::Fixture),
            other => Err(StoreError::InvalidConfig(format!(
                "Unknown catalog source: '{}'. Valid options: live, fixture",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base address every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:4000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Display settings handed to the UI layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Currency symbol prefixed to formatted amounts.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "$".to_string()
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency: default_currency(),
        }
    }
}

/// Catalog loading settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default)]
    pub source: CatalogSource,

    /// JSON file holding a product array. When unset in fixture mode, the
    /// bundled fixture is used.
    #[serde(default)]
    pub fixture_path: Option<PathBuf>,
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub display: DisplaySettings,

    #[serde(default)]
    pub catalog: CatalogSettings,
}

impl StorefrontConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> StoreResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StoreError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| StoreError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Storefront config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StoreResult<()> {
        let url = &self.api.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(StoreError::InvalidUrl(format!(
                "Backend URL must start with http:// or https://, got: {}",
                url
            )));
        }
        url::Url::parse(url)?;

        if self.api.timeout_secs == 0 {
            return Err(StoreError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("STOREFRONT_BACKEND_URL") {
            debug!(url = %url, "Overriding backend URL from environment");
            self.api.base_url = url;
        }

        if let Ok(timeout) = std::env::var("STOREFRONT_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse::<u64>() {
                self.api.timeout_secs = t;
            }
        }

        if let Ok(currency) = std::env::var("STOREFRONT_CURRENCY") {
            self.display.currency = currency;
        }

        if let Ok(source) = std::env::var("STOREFRONT_CATALOG_SOURCE") {
            match source.parse() {
                Ok(parsed) => {
                    debug!(source = %source, "Overriding catalog source from environment");
                    self.catalog.source = parsed;
                }
                Err(_) => warn!(source = %source, "Unknown catalog source in environment"),
            }
        }

        if let Ok(path) = std::env::var("STOREFRONT_FIXTURE_PATH") {
            self.catalog.fixture_path = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "storefront", "client")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn base_url(&self) -> &str {
        &self.api.base_url
    }

    pub fn currency(&self) -> &str {
        &self.display.currency
    }

    pub fn catalog_source(&self) -> CatalogSource {
        self.catalog.source
    }
}
