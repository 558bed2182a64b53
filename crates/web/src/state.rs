use std::sync::Arc;

use storage::Database;
use tryon::TryOnPipeline;

use crate::events::EventBus;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub events: Arc<EventBus>,
    /// Absent when the generation collaborator is not configured;
    /// try-on submissions then fail with UNEXPECTED_STATE.
    pub pipeline: Option<Arc<TryOnPipeline>>,
}
