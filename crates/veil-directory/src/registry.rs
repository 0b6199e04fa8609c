//! In-memory node registry.

use parking_lot::Mutex;
use thiserror::Error;
use veil_proto::v1::NodeEntry;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("node {0} is already registered")]
    Duplicate(u32),
}

/// Append-only registry of node id → public key for the session.
///
/// One mutex around check-then-insert: exactly one registration of a
/// given id succeeds no matter how registrations interleave. Listing
/// returns entries in insertion order.
pub struct NodeRegistry {
    nodes: Mutex<Vec<NodeEntry>>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self {
            nodes: Mutex::new(Vec::new()),
        }
    }

    /// Register a node, rejecting duplicates by id.
    pub fn register(&self, node_id: u32, pub_key: String) -> Result<NodeEntry, RegistryError> {
        let mut nodes = self.nodes.lock();
        if nodes.iter().any(|n| n.node_id == node_id) {
            return Err(RegistryError::Duplicate(node_id));
        }
        let entry = NodeEntry { node_id, pub_key };
        nodes.push(entry.clone());
        Ok(entry)
    }

    /// Snapshot of all registered nodes at call time.
    pub fn list(&self) -> Vec<NodeEntry> {
        self.nodes.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.nodes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.lock().is_empty()
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
