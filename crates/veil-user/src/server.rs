//! User endpoint server

use std::sync::Arc;

use anyhow::Result;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::create_router;
use crate::config::UserConfig;
use crate::state::{AppState, RecordedState};

/// User endpoint server
pub struct UserServer {
    config: UserConfig,
    records: Arc<RecordedState>,
}

impl UserServer {
    /// Create new user server
    pub fn new(config: UserConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            records: Arc::new(RecordedState::new()),
        })
    }

    pub fn records(&self) -> Arc<RecordedState> {
        self.records.clone()
    }

    /// Run the user endpoint server
    pub async fn run(&self) -> Result<()> {
        let http = reqwest::Client::builder()
            .timeout(self.config.request_timeout())
            .build()?;

        let state = AppState {
            config: self.config.clone(),
            http,
            records: self.records.clone(),
        };

        let app = create_router(state)
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

        let listener = tokio::net::TcpListener::bind(&self.config.listen_addr).await?;
        info!(
            user_id = self.config.user_id,
            "user endpoint listening on {}", self.config.listen_addr
        );

        axum::serve(listener, app).await?;

        Ok(())
    }
}
