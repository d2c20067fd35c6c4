//! Runtime configuration loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: String },

    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration parsing failed: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

/// Settings for [`ProxySystem`](super::ProxySystem) and the demo binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Capacity of the backing store's request channel.
    pub store_buffer: usize,
    /// Filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Namespace the demo operates in.
    pub namespace: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            store_buffer: 32,
            log_filter: "info".to_string(),
            namespace: "default".to_string(),
        }
    }
}

impl SystemConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Loading configuration from: {:?}", path);

        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_string_lossy().to_string(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string_lossy().to_string(),
            source,
        })?;

        let config = Self::from_toml_str(&content)?;
        info!("Configuration loaded from: {:?}", path);
        Ok(config)
    }

    /// Parses and validates a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SystemConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store_buffer == 0 {
            return Err(ConfigError::Invalid {
                field: "store_buffer".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.namespace.is_empty() {
            return Err(ConfigError::Invalid {
                field: "namespace".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
