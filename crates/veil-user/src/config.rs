//! Configuration management

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use veil_onion::DEFAULT_CIRCUIT_HOPS;

/// Base port for user listeners; user `n` defaults to `3000 + n`.
pub const BASE_USER_PORT: u16 = 3000;
/// Base port relays are assumed to listen on, matching the relay side.
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

/// User endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    pub user_id: u32,
    pub listen_addr: SocketAddr,
    pub directory_url: String,
    pub relay_host: String,
    pub relay_base_port: u16,
    pub user_base_port: u16,
    pub circuit_hops: usize,
    pub request_timeout_secs: u64,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            user_id: 0,
            listen_addr: SocketAddr::from(([0, 0, 0, 0], BASE_USER_PORT)),
            directory_url: "http://127.0.0.1:8080".to_string(),
            relay_host: "127.0.0.1".to_string(),
            relay_base_port: BASE_RELAY_PORT,
            user_base_port: BASE_USER_PORT,
            circuit_hops: DEFAULT_CIRCUIT_HOPS,
            request_timeout_secs: 10,
        }
    }
}

impl UserConfig {
    /// Load configuration from environment variables and an optional
    /// TOML file named by `VEIL_USER_CONFIG`.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("VEIL_USER_CONFIG") {
            config.load_from_toml(&path)?;
        }

        if let Ok(id) = std::env::var("VEIL_USER_ID") {
            config.user_id = id
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("Invalid user_id: {}", e)))?;
            config.listen_addr = SocketAddr::from((
                [0, 0, 0, 0],
                config.user_base_port.saturating_add(config.user_id as u16),
            ));
        }

        if let Ok(addr) = std::env::var("VEIL_USER_LISTEN_ADDR") {
            config.listen_addr = addr
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("Invalid listen_addr: {}", e)))?;
        }

        if let Ok(url) = std::env::var("VEIL_USER_DIRECTORY_URL") {
            config.directory_url = url;
        }

        if let Ok(hops) = std::env::var("VEIL_USER_CIRCUIT_HOPS") {
            config.circuit_hops = hops
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("Invalid circuit_hops: {}", e)))?;
        }

        config.validate()?;

        Ok(config)
    }

    fn load_from_toml(&mut self, path: &str) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let parsed: UserConfig = toml::from_str(&content)?;
        *self = parsed;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.circuit_hops < 2 {
            return Err(ConfigError::Invalid(
                "circuit_hops must be at least 2".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be > 0".to_string(),
            ));
        }

        if self.directory_url.is_empty() {
            return Err(ConfigError::Invalid("directory_url must be set".to_string()));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
