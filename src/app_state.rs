//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::BatchDispatcher;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Batch dispatcher wrapping the survey pipeline and its clients.
    pub dispatcher: Arc<BatchDispatcher>,
}

impl AppState {
    /// Creates the state around a dispatcher.
    #[must_use]
    pub fn new(dispatcher: BatchDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }
}
