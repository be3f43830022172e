//! Application configuration.
//!
//! Loaded once at startup from a YAML file and passed by value to the parts
//! that need it; nothing reads configuration from global state.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::cache::CacheConfig;
use crate::connector::{AirlineDirectory, FareApiConfig};
use crate::planner::SearchConfig;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "TRIP_PLANNER_CONFIG";

/// Config file used when `TRIP_PLANNER_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "./config/config.yaml";

/// Errors from loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid YAML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Config parsed but a value is unusable
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Settings for the available fare connectors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectorsConfig {
    pub fare_api: Option<FareApiConfig>,
}

/// Which fare connector a tool should use, chosen by connector name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectorKind {
    /// Fares typed in at the terminal
    #[default]
    Manual,
    /// Fares fetched from `connectors.fare_api`
    FareApi,
}

impl ConnectorKind {
    /// Look up a connector by the name it uses in cache keys.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name {
            "manual" => Ok(Self::Manual),
            "fare_api" => Ok(Self::FareApi),
            other => Err(ConfigError::Invalid(format!(
                "unknown connector {other:?}; expected \"manual\" or \"fare_api\""
            ))),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Directory of cached fares
    pub cache_dir: PathBuf,

    /// Seconds a cached fare satisfies a lookup
    pub cache_timeout: u64,

    /// Airline name to two-character code
    #[serde(default)]
    pub airlines: BTreeMap<String, String>,

    #[serde(default)]
    pub connectors: ConnectorsConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load from the path in `TRIP_PLANNER_CONFIG`, or the default path.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load(&path)
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Parse and validate YAML config text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, code) in &self.airlines {
            if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(ConfigError::Invalid(format!(
                    "airline {name:?} has code {code:?}; expected two letters or digits"
                )));
            }
        }
        Ok(())
    }

    /// Cache settings for [`LegCache`](crate::cache::LegCache).
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new(&self.cache_dir).with_ttl(Duration::from_secs(self.cache_timeout))
    }

    /// Settings for the fare API connector, which must be configured to be used.
    pub fn fare_api(&self) -> Result<&FareApiConfig, ConfigError> {
        self.connectors
            .fare_api
            .as_ref()
            .ok_or_else(|| ConfigError::Invalid("connectors.fare_api is not configured".into()))
    }

    pub fn airline_directory(&self) -> AirlineDirectory {
        AirlineDirectory::new(self.airlines.clone())
    }
}
