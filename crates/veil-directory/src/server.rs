//! Directory server

use std::sync::Arc;

use anyhow::Result;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{create_router, ApiState};
use crate::config::ServerConfig;
use crate::registry::NodeRegistry;

/// Directory server
pub struct DirectoryServer {
    config: ServerConfig,
    registry: Arc<NodeRegistry>,
}

impl DirectoryServer {
    /// Create new directory server
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            registry: Arc::new(NodeRegistry::new()),
        }
    }

    pub fn registry(&self) -> Arc<NodeRegistry> {
        self.registry.clone()
    }

    /// Run the directory server
    pub async fn run(&self) -> Result<()> {
        let state = ApiState {
            registry: self.registry.clone(),
        };

        let app = create_router(state)
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

        let listener = tokio::net::TcpListener::bind(&self.config.listen_addr).await?;
        info!("directory listening on {}", self.config.listen_addr);

        axum::serve(listener, app).await?;

        Ok(())
    }
}
