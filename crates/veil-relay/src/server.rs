//! Relay server

use std::sync::Arc;

use anyhow::Result;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use veil_crypto::KeyPair;
use veil_onion::check_layer_constants;

use crate::api::create_router;
use crate::config::RelayConfig;
use crate::registration::register_with_directory;
use crate::state::{AppState, ObservedState};

/// Relay server
pub struct RelayServer {
    config: RelayConfig,
    keys: Arc<KeyPair>,
    observed: Arc<ObservedState>,
}

impl RelayServer {
    /// Create new relay server: validates the config and the layer
    /// constants, then generates this process's key pair.
    pub fn new(config: RelayConfig) -> Result<Self> {
        config.validate()?;
        check_layer_constants()?;

        Ok(Self {
            config,
            keys: Arc::new(KeyPair::generate()),
            observed: Arc::new(ObservedState::new()),
        })
    }

    pub fn observed(&self) -> Arc<ObservedState> {
        self.observed.clone()
    }

    /// Run the relay: register with the directory, then serve.
    pub async fn run(&self) -> Result<()> {
        let http = reqwest::Client::builder()
            .timeout(self.config.forward_timeout())
            .build()?;

        register_with_directory(
            &http,
            &self.config.directory_url,
            self.config.node_id,
            self.keys.public_key_text(),
        )
        .await?;

        let state = AppState {
            node_id: self.config.node_id,
            keys: self.keys.clone(),
            observed: self.observed.clone(),
            http,
            forward_host: self.config.forward_host.clone(),
        };

        let app = create_router(state)
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

        let listener = tokio::net::TcpListener::bind(&self.config.listen_addr).await?;
        info!(
            node_id = self.config.node_id,
            "relay listening on {}", self.config.listen_addr
        );

        axum::serve(listener, app).await?;

        Ok(())
    }
}
