//! Configuration management

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base port for relay listeners; relay `n` defaults to `4000 + n`.
pub const BASE_RELAY_PORT: u16 = 4000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    pub node_id: u32,
    pub listen_addr: SocketAddr,
    pub directory_url: String,
    pub forward_host: String,
    pub forward_timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            node_id: 0,
            listen_addr: SocketAddr::from(([0, 0, 0, 0], BASE_RELAY_PORT)),
            directory_url: "http://127.0.0.1:8080".to_string(),
            forward_host: "127.0.0.1".to_string(),
            forward_timeout_secs: 10,
        }
    }
}

impl RelayConfig {
    /// Load configuration from environment variables and an optional
    /// TOML file named by `VEIL_RELAY_CONFIG`.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("VEIL_RELAY_CONFIG") {
            config.load_from_toml(&path)?;
        }

        if let Ok(id) = std::env::var("VEIL_RELAY_NODE_ID") {
            config.node_id = id
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("Invalid node_id: {}", e)))?;
            config.listen_addr = SocketAddr::from((
                [0, 0, 0, 0],
                BASE_RELAY_PORT.saturating_add(config.node_id as u16),
            ));
        }

        if let Ok(addr) = std::env::var("VEIL_RELAY_LISTEN_ADDR") {
            config.listen_addr = addr
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("Invalid listen_addr: {}", e)))?;
        }

        if let Ok(url) = std::env::var("VEIL_RELAY_DIRECTORY_URL") {
            config.directory_url = url;
        }

        if let Ok(host) = std::env::var("VEIL_RELAY_FORWARD_HOST") {
            config.forward_host = host;
        }

        if let Ok(secs) = std::env::var("VEIL_RELAY_FORWARD_TIMEOUT_SECS") {
            config.forward_timeout_secs = secs
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("Invalid forward_timeout_secs: {}", e)))?;
        }

        config.validate()?;

        Ok(config)
    }

    fn load_from_toml(&mut self, path: &str) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let parsed: RelayConfig = toml::from_str(&content)?;
        *self = parsed;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.forward_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "forward_timeout_secs must be > 0".to_string(),
            ));
        }

        if self.directory_url.is_empty() {
            return Err(ConfigError::Invalid("directory_url must be set".to_string()));
        }

        Ok(())
    }

    pub fn forward_timeout(&self) -> Duration {
        Duration::from_secs(self.forward_timeout_secs)
    }
}
