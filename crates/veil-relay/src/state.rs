//! Per-relay runtime state.

use std::sync::Arc;

use parking_lot::RwLock;
use veil_crypto::KeyPair;

/// Observability sink for the relay's last handled message.
///
/// Debug-only: each field is a single assignment under its own lock, so
/// concurrent messages race to last-writer-wins without corrupting a
/// value. Not part of protocol correctness.
#[derive(Default)]
pub struct ObservedState {
    last_encrypted: RwLock<Option<String>>,
    last_decrypted: RwLock<Option<String>>,
    last_destination: RwLock<Option<u16>>,
}

impl ObservedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_encrypted(&self, message: String) {
        *self.last_encrypted.write() = Some(message);
    }

    pub fn record_decrypted(&self, remainder: String) {
        *self.last_decrypted.write() = Some(remainder);
    }

    pub fn record_destination(&self, destination: u16) {
        *self.last_destination.write() = Some(destination);
    }

    pub fn last_encrypted(&self) -> Option<String> {
        self.last_encrypted.read().clone()
    }

    pub fn last_decrypted(&self) -> Option<String> {
        self.last_decrypted.read().clone()
    }

    pub fn last_destination(&self) -> Option<u16> {
        *self.last_destination.read()
    }
}

/// Shared state handed to the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub node_id: u32,
    pub keys: Arc<KeyPair>,
    pub observed: Arc<ObservedState>,
    pub http: reqwest::Client,
    pub forward_host: String,
}
