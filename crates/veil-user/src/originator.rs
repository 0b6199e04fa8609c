//! Onion origination: directory snapshot → circuit → nested layers →
//! entry relay.

use thiserror::Error;
use tracing::{debug, info};

use veil_onion::{build_onion, select_route, Hop, OnionError};
use veil_proto::v1::{MessageBody, NodeRegistryResponse};

use crate::state::AppState;

#[derive(Debug, Error)]
pub enum SendError {
    #[error("directory request failed: {0}")]
    Directory(#[source] reqwest::Error),
    #[error(transparent)]
    Onion(#[from] OnionError),
    #[error("entry relay request failed: {0}")]
    EntryRelay(#[source] reqwest::Error),
    #[error("entry relay rejected the layer: {0}")]
    EntryRelayStatus(reqwest::StatusCode),
}

/// Build a circuit and send `message` toward `destination_user_id`.
///
/// Returns the node-id sequence of the circuit used. Only the handoff
/// to the entry relay is observed here; anything past the first hop is
/// invisible to the sender.
pub async fn send_onion(
    state: &AppState,
    message: &str,
    destination_user_id: u32,
) -> Result<Vec<u32>, SendError> {
    let config = &state.config;

    let url = format!(
        "{}/getNodeRegistry",
        config.directory_url.trim_end_matches('/')
    );
    let registry: NodeRegistryResponse = state
        .http
        .get(&url)
        .send()
        .await
        .map_err(SendError::Directory)?
        .error_for_status()
        .map_err(SendError::Directory)?
        .json()
        .await
        .map_err(SendError::Directory)?;

    let route = select_route(&registry.nodes, config.circuit_hops, &mut rand::thread_rng())?;
    let hops: Vec<Hop> = route
        .iter()
        .map(|entry| Hop {
            node_id: entry.node_id,
            port: config.relay_base_port.saturating_add(entry.node_id as u16),
            pub_key: entry.pub_key.clone(),
        })
        .collect();

    let destination_port = config
        .user_base_port
        .saturating_add(destination_user_id as u16);
    let wire = build_onion(&hops, destination_port, message)?;

    debug!(
        circuit = ?hops.iter().map(|h| h.node_id).collect::<Vec<_>>(),
        destination_port,
        "built onion"
    );

    let entry = &hops[0];
    let url = format!("http://{}:{}/message", config.relay_host, entry.port);
    let resp = state
        .http
        .post(&url)
        .json(&MessageBody { message: wire })
        .send()
        .await
        .map_err(SendError::EntryRelay)?;

    if !resp.status().is_success() {
        return Err(SendError::EntryRelayStatus(resp.status()));
    }

    info!(
        user_id = config.user_id,
        entry_node = entry.node_id,
        "handed layer 1 to entry relay"
    );

    Ok(hops.into_iter().map(|h| h.node_id).collect())
}
