//! HTTP API endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, Router},
    Json,
};
use tracing::{info, warn};

use veil_onion::OnionError;
use veil_proto::v1::{MessageBody, ResultResponse, SendMessageRequest};

use crate::originator::{send_onion, SendError};
use crate::state::AppState;

/// Create API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/message", post(post_message))
        .route("/sendMessage", post(post_send_message))
        .route("/getLastReceivedMessage", get(get_last_received))
        .route("/getLastSentMessage", get(get_last_sent))
        .route("/getLastCircuit", get(get_last_circuit))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// POST /message - Record a delivered message
///
/// The body is whatever the last relay recovered; this endpoint does
/// not distinguish plaintext from anything else.
async fn post_message(State(state): State<AppState>, Json(body): Json<MessageBody>) -> StatusCode {
    info!(user_id = state.config.user_id, "received message");
    state.records.record_received(body.message);
    StatusCode::OK
}

/// POST /sendMessage - Originate a message through a fresh circuit
async fn post_send_message(
    State(state): State<AppState>,
    Json(body): Json<SendMessageRequest>,
) -> Response {
    match send_onion(&state, &body.message, body.destination_user_id).await {
        Ok(circuit) => {
            state.records.record_sent(body.message);
            state.records.record_circuit(circuit);
            (StatusCode::OK, "success").into_response()
        }
        Err(SendError::Onion(err @ OnionError::InsufficientNodes { .. })) => {
            warn!(user_id = state.config.user_id, %err, "cannot build circuit");
            (StatusCode::BAD_REQUEST, err.to_string()).into_response()
        }
        Err(err @ SendError::Directory(_)) => {
            warn!(user_id = state.config.user_id, %err, "directory unavailable");
            (StatusCode::BAD_GATEWAY, "Directory unavailable").into_response()
        }
        Err(err @ (SendError::EntryRelay(_) | SendError::EntryRelayStatus(_))) => {
            warn!(user_id = state.config.user_id, %err, "entry relay failed");
            (StatusCode::BAD_GATEWAY, "Entry relay unavailable").into_response()
        }
        Err(err) => {
            warn!(user_id = state.config.user_id, %err, "failed to build onion");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build onion").into_response()
        }
    }
}

/// GET /getLastReceivedMessage
async fn get_last_received(State(state): State<AppState>) -> Json<ResultResponse<String>> {
    Json(ResultResponse {
        result: state.records.last_received(),
    })
}

/// GET /getLastSentMessage
async fn get_last_sent(State(state): State<AppState>) -> Json<ResultResponse<String>> {
    Json(ResultResponse {
        result: state.records.last_sent(),
    })
}

/// GET /getLastCircuit - Node-id sequence of the last circuit used
async fn get_last_circuit(State(state): State<AppState>) -> Json<ResultResponse<Vec<u32>>> {
    Json(ResultResponse {
        result: state.records.last_circuit(),
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
