use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionService;
use crate::sessions::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// `None` when no API key is configured.
    pub llm: Option<Arc<dyn CompletionService>>,
    pub sessions: SessionStore,
}
