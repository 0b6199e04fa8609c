//! Version 1 wire types.

use serde::{Deserialize, Serialize};

/// One directory entry: a node id and its exported public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeEntry {
    pub node_id: u32,
    pub pub_key: String,
}

/// Body of `POST /registerNode`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterNodeRequest {
    pub node_id: u32,
    pub pub_key: String,
}

/// Success body returned by `POST /registerNode`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterNodeResponse {
    pub message: String,
    pub node: NodeEntry,
}

/// Error body for rejected requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body returned by `GET /getNodeRegistry`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRegistryResponse {
    pub nodes: Vec<NodeEntry>,
}

/// Body of `POST /message` on relays and user endpoints.
///
/// `message` carries an opaque text blob: an onion layer for a relay,
/// final plaintext for a user endpoint. Receivers do not distinguish.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

/// Body of `POST /sendMessage` on a user endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub message: String,
    pub destination_user_id: u32,
}

/// Body of the debug `GET /getLast*` endpoints: the recorded value, or
/// null when nothing has been observed yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultResponse<T> {
    pub result: Option<T>,
}
