//! Application configuration
//!
//! Loaded from an optional JSON file shaped like `appsettings.json`, then
//! overridden by environment variables:
//!
//! | Variable | Setting |
//! |---|---|
//! | `SUITES_HOST` / `SUITES_PORT` | listen address |
//! | `SUITES_MAX_CONCURRENT_REQUESTS` | in-flight request cap |
//! | `SUITES_DB_PATH` | SQLite file |
//! | `SUITES_EMBEDDING_DIMENSIONS` | candidate store dimensionality |
//! | `SUITES_PROVIDER_TIMEOUT_SECS` | provider call bound |
//! | `AZURE_OPENAI_ENDPOINT`, `AZURE_OPENAI_API_KEY` | Azure resource |
//! | `AZURE_OPENAI_DEPLOYMENT_NAME` | chat deployment |
//! | `AZURE_OPENAI_EMBEDDING_DEPLOYMENT_NAME` | embedding deployment |
//! | `AZURE_OPENAI_API_VERSION` | REST API version |

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use suites_core::AzureOpenAiConfig;

use crate::api::DEFAULT_CONCURRENCY_LIMIT;

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

/// Listen address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// In-flight requests across all routes
    pub max_concurrent_requests: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5292,
            max_concurrent_requests: DEFAULT_CONCURRENCY_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseConfig {
    /// SQLite file; platform data directory when unset
    pub path: Option<PathBuf>,
}

/// Search tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    /// Dimensionality of stored maintenance request vectors
    pub embedding_dimensions: usize,
    pub provider_timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            // text-embedding-ada-002
            embedding_dimensions: 1536,
            provider_timeout_secs: 30,
        }
    }
}

impl SearchConfig {
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs.max(1))
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(rename = "azureOpenAI")]
    pub azure_openai: AzureOpenAiConfig,
    pub search: SearchConfig,
}

impl AppConfig {
    /// File (if any) first, then process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a JSON config file; missing sections take defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply overrides from a key lookup (the environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SUITES_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("SUITES_PORT") {
            self.server.port = parse_value("SUITES_PORT", &v)?;
        }
        if let Some(v) = lookup("SUITES_MAX_CONCURRENT_REQUESTS") {
            self.server.max_concurrent_requests =
                parse_value("SUITES_MAX_CONCURRENT_REQUESTS", &v)?;
        }
        if let Some(v) = lookup("SUITES_DB_PATH") {
            self.database.path = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("SUITES_EMBEDDING_DIMENSIONS") {
            self.search.embedding_dimensions = parse_value("SUITES_EMBEDDING_DIMENSIONS", &v)?;
        }
        if let Some(v) = lookup("SUITES_PROVIDER_TIMEOUT_SECS") {
            self.search.provider_timeout_secs = parse_value("SUITES_PROVIDER_TIMEOUT_SECS", &v)?;
        }

        let azure = &mut self.azure_openai;
        if let Some(v) = lookup("AZURE_OPENAI_ENDPOINT") {
            azure.endpoint = v;
        }
        if let Some(v) = lookup("AZURE_OPENAI_API_KEY") {
            azure.api_key = v;
        }
        if let Some(v) = lookup("AZURE_OPENAI_DEPLOYMENT_NAME") {
            azure.deployment_name = v;
        }
        if let Some(v) = lookup("AZURE_OPENAI_EMBEDDING_DEPLOYMENT_NAME") {
            azure.embedding_deployment_name = v;
        }
        if let Some(v) = lookup("AZURE_OPENAI_API_VERSION") {
            azure.api_version = v;
        }

        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
