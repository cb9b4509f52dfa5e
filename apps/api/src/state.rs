use std::sync::Arc;

use crate::ats::engine::AtsEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Immutable after startup; every request gets fresh random sources from it.
    pub engine: Arc<AtsEngine>,
}
