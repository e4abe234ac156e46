use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Text-completion backend. `LlmClient` in production, a scripted double in tests.
    pub completion: Arc<dyn CompletionService>,
    pub config: Config,
}
