use std::sync::Arc;

use crate::screening::dialogue::DialogueEngine;
use crate::screening::sessions::SessionRegistry;
use crate::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub engine: DialogueEngine,
    pub sessions: SessionRegistry,
    /// Same store the engine persists into; read by the candidate listing.
    pub store: Arc<RecordStore>,
}
