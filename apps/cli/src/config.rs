//! # CLI Configuration
//!
//! Configuration for the Importa binary.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     IMPORTA_DB_PATH=/tmp/importa.db                                     │
//! │     IMPORTA_RATES_ENDPOINT=https://mirror.example/v6/latest/            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/importa/config.toml (Linux)                               │
//! │     ~/Library/Application Support/com.importa.importa (macOS)           │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     platform data dir + importa.db, public provider endpoint            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # config.toml
//! [storage]
//! db_path = "/home/me/.local/share/importa/importa.db"
//!
//! [rates]
//! endpoint = "https://open.er-api.com/v6/latest/"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use importa_rates::DEFAULT_ENDPOINT;

// =============================================================================
// Sections
// =============================================================================

/// Where the state database lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            db_path: default_db_path(),
        }
    }
}

/// Exchange-rate provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSettings {
    /// Provider endpoint; the base currency code is appended.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for RateSettings {
    fn default() -> Self {
        RateSettings {
            endpoint: default_endpoint(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_db_path() -> PathBuf {
    directories::ProjectDirs::from("com", "importa", "importa")
        .map(|dirs| dirs.data_dir().join("importa.db"))
        .unwrap_or_else(|| PathBuf::from("importa.db"))
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database location.
    #[serde(default)]
    pub storage: StorageSettings,

    /// Rate provider settings.
    #[serde(default)]
    pub rates: RateSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (config.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Self {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                match std::fs::read_to_string(&path) {
                    Ok(contents) => match toml::from_str(&contents) {
                        Ok(parsed) => config = parsed,
                        Err(e) => warn!(?path, error = %e, "Invalid config file, using defaults"),
                    },
                    Err(e) => warn!(?path, error = %e, "Unreadable config file, using defaults"),
                }
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("IMPORTA_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.storage.db_path = PathBuf::from(path);
        }
        if let Ok(endpoint) = std::env::var("IMPORTA_RATES_ENDPOINT") {
            debug!(endpoint = %endpoint, "Overriding rate endpoint from environment");
            self.rates.endpoint = endpoint;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "importa", "importa")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
