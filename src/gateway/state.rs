use std::sync::Arc;
use std::time::Instant;

use crate::dispatcher::Dispatcher;

/// Shared gateway state. Everything here is read-only after startup; requests
/// never mutate it, so the gateway stays concurrency-unaware by construction.
pub struct AppState {
    /// Outbound client for the upstream simulation service.
    pub dispatcher: Arc<Dispatcher>,
    /// Process start, for the health endpoint.
    pub started: Instant,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            started: Instant::now(),
        }
    }
}
