//! Shared application state: explicitly constructed services passed to every
//! handler, no process-wide singletons.

use std::sync::Arc;

use generation::ResponseService;
use retrieval::ContextRetrievalService;
use session_history::SessionStore;

/// Handle bundle cloned into each request handler.
#[derive(Clone)]
pub struct AppState {
    pub generation: Arc<ResponseService>,
    pub retrieval: Arc<ContextRetrievalService>,
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    pub fn new(
        generation: Arc<ResponseService>,
        retrieval: Arc<ContextRetrievalService>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            generation,
            retrieval,
            sessions,
        }
    }
}
