//! HTTP API endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, Router},
    Json,
};
use tracing::{info, warn};

use veil_onion::{peel_layer, OnionError};
use veil_proto::v1::{MessageBody, ResultResponse};

use crate::state::AppState;

/// Create API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/message", post(post_message))
        .route(
            "/getLastReceivedEncryptedMessage",
            get(get_last_encrypted),
        )
        .route(
            "/getLastReceivedDecryptedMessage",
            get(get_last_decrypted),
        )
        .route("/getLastMessageDestination", get(get_last_destination))
        .route("/getPrivateKey", get(get_private_key))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// POST /message - Accept one onion layer, peel it, forward the rest
///
/// Processing is synchronous: the response reports the outcome of both
/// the peel and the forward. A failure aborts this message only.
async fn post_message(State(state): State<AppState>, Json(body): Json<MessageBody>) -> Response {
    state.observed.record_encrypted(body.message.clone());

    let peeled = match peel_layer(&body.message, state.keys.secret()) {
        Ok(peeled) => peeled,
        Err(err @ OnionError::MalformedLayer { .. }) => {
            warn!(node_id = state.node_id, %err, "rejected malformed layer");
            return (StatusCode::BAD_REQUEST, "Malformed layer").into_response();
        }
        Err(err @ OnionError::BadDestinationTag(_)) => {
            warn!(node_id = state.node_id, %err, "rejected layer with bad destination tag");
            return (StatusCode::BAD_REQUEST, "Bad destination tag").into_response();
        }
        Err(err) => {
            warn!(node_id = state.node_id, %err, "failed to decrypt layer");
            return (StatusCode::BAD_REQUEST, "Layer not decryptable by this relay")
                .into_response();
        }
    };

    state.observed.record_decrypted(peeled.remainder.clone());
    state.observed.record_destination(peeled.next_hop);

    let url = format!("http://{}:{}/message", state.forward_host, peeled.next_hop);
    let forward = state
        .http
        .post(&url)
        .json(&MessageBody {
            message: peeled.remainder,
        })
        .send()
        .await;

    // Forwarding failures do not roll back the observed state above.
    match forward {
        Ok(resp) if resp.status().is_success() => {
            info!(
                node_id = state.node_id,
                destination = peeled.next_hop,
                "forwarded message"
            );
            (StatusCode::OK, "success").into_response()
        }
        Ok(resp) => {
            warn!(
                node_id = state.node_id,
                destination = peeled.next_hop,
                status = %resp.status(),
                "next hop rejected the message"
            );
            (StatusCode::BAD_GATEWAY, "Next hop rejected the message").into_response()
        }
        Err(err) => {
            warn!(
                node_id = state.node_id,
                destination = peeled.next_hop,
                %err,
                "next hop unreachable"
            );
            (StatusCode::BAD_GATEWAY, "Next hop unreachable").into_response()
        }
    }
}

/// GET /getLastReceivedEncryptedMessage
async fn get_last_encrypted(State(state): State<AppState>) -> Json<ResultResponse<String>> {
    Json(ResultResponse {
        result: state.observed.last_encrypted(),
    })
}

/// GET /getLastReceivedDecryptedMessage
async fn get_last_decrypted(State(state): State<AppState>) -> Json<ResultResponse<String>> {
    Json(ResultResponse {
        result: state.observed.last_decrypted(),
    })
}

/// GET /getLastMessageDestination
async fn get_last_destination(State(state): State<AppState>) -> Json<ResultResponse<u16>> {
    Json(ResultResponse {
        result: state.observed.last_destination(),
    })
}

/// GET /getPrivateKey - Exported private key, for test harnesses only
async fn get_private_key(State(state): State<AppState>) -> Json<ResultResponse<String>> {
    Json(ResultResponse {
        result: Some(state.keys.private_key_text()),
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
