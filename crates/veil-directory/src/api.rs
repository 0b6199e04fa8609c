//! HTTP API endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, Router},
    Json,
};
use tracing::{info, warn};

use veil_proto::v1::{
    ErrorResponse, NodeRegistryResponse, RegisterNodeRequest, RegisterNodeResponse,
};

use crate::registry::{NodeRegistry, RegistryError};

#[derive(Clone)]
pub struct ApiState {
    pub registry: Arc<NodeRegistry>,
}

/// Create API router
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/registerNode", post(register_node))
        .route("/getNodeRegistry", get(get_node_registry))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// POST /registerNode - Register a relay's public key
async fn register_node(
    State(state): State<ApiState>,
    Json(body): Json<RegisterNodeRequest>,
) -> Response {
    match state.registry.register(body.node_id, body.pub_key) {
        Ok(node) => {
            info!(node_id = node.node_id, "registered node");
            (
                StatusCode::CREATED,
                Json(RegisterNodeResponse {
                    message: "Node registered successfully".to_string(),
                    node,
                }),
            )
                .into_response()
        }
        Err(err) => {
            let error = err.to_string();
            let RegistryError::Duplicate(node_id) = err;
            warn!(node_id, "rejected duplicate registration");
            (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
        }
    }
}

/// GET /getNodeRegistry - Full registry snapshot
async fn get_node_registry(State(state): State<ApiState>) -> Json<NodeRegistryResponse> {
    Json(NodeRegistryResponse {
        nodes: state.registry.list(),
    })
}

/// GET /status - Liveness probe
async fn status_handler() -> &'static str {
    "live"
}

/// GET /health - Health check
async fn health_handler() -> StatusCode {
    StatusCode::OK
}
