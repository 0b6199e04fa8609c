//! Configuration management

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default directory port.
pub const DEFAULT_DIRECTORY_PORT: u16 = 8080;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_DIRECTORY_PORT)),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables and an optional
    /// TOML file named by `VEIL_DIRECTORY_CONFIG`.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("VEIL_DIRECTORY_CONFIG") {
            config.load_from_toml(&path)?;
        }

        if let Ok(addr) = std::env::var("VEIL_DIRECTORY_LISTEN_ADDR") {
            config.listen_addr = addr
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("Invalid listen_addr: {}", e)))?;
        }

        Ok(config)
    }

    fn load_from_toml(&mut self, path: &str) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let toml_config: toml::Value = toml::from_str(&content)?;

        if let Some(addr) = toml_config.get("listen_addr").and_then(|v| v.as_str()) {
            self.listen_addr = addr
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("Invalid listen_addr in TOML: {}", e)))?;
        }

        Ok(())
    }
}
