//! Configuration management for the CompanionFit host
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config file (explicit path, or config/development.toml / config/production.toml)
//! 3. Environment variables (prefix: CF__)

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub storage: StorageConfig,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Where the user aggregate is persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    pub file_name: String,
}

impl StorageConfig {
    pub fn user_file(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.file_name)
    }
}

/// Platform health-data integration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthConfig {
    pub enabled: bool,
}

/// Engine tuning
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fixed seed for stat rolls; random when unset
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                data_dir: ".companionfit".to_string(),
                file_name: "user.json".to_string(),
            },
            health: HealthConfig::default(),
            engine: EngineConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. `path` if given, else config file based on RUST_ENV
    /// 3. Environment variables with CF__ prefix
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let config_file = match path {
            Some(path) => path.to_string_lossy().into_owned(),
            None => {
                let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
                format!("config/{}.toml", env)
            }
        };

        let defaults = config::Config::try_from(&AppConfig::default())
            .map_err(|e| AppError::Config(e.to_string()))?;

        let config = config::Config::builder()
            // Start with defaults
            .add_source(defaults)
            // An explicit path must exist; the per-environment file is optional
            .add_source(config::File::with_name(&config_file).required(path.is_some()))
            // Override with environment variables (CF__ prefix)
            // e.g., CF__STORAGE__DATA_DIR=/tmp/cf sets storage.data_dir
            .add_source(
                config::Environment::with_prefix("CF")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}
