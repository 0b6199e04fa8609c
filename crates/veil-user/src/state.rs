//! Per-user runtime state.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::UserConfig;

/// Observability sink for a user endpoint.
///
/// Debug-only, last-writer-wins per field, one assignment per lock.
#[derive(Default)]
pub struct RecordedState {
    last_received: RwLock<Option<String>>,
    last_sent: RwLock<Option<String>>,
    last_circuit: RwLock<Option<Vec<u32>>>,
}

impl RecordedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_received(&self, message: String) {
        *self.last_received.write() = Some(message);
    }

    pub fn record_sent(&self, message: String) {
        *self.last_sent.write() = Some(message);
    }

    pub fn record_circuit(&self, circuit: Vec<u32>) {
        *self.last_circuit.write() = Some(circuit);
    }

    pub fn last_received(&self) -> Option<String> {
        self.last_received.read().clone()
    }

    pub fn last_sent(&self) -> Option<String> {
        self.last_sent.read().clone()
    }

    pub fn last_circuit(&self) -> Option<Vec<u32>> {
        self.last_circuit.read().clone()
    }
}

/// Shared state handed to the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: UserConfig,
    pub http: reqwest::Client,
    pub records: Arc<RecordedState>,
}
