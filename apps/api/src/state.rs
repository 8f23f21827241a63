use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::store::MemoryStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable text-generation backend. Production: `LlmClient`.
    pub llm: Arc<dyn TextGenerator>,
    /// In-memory record store; lives as long as the process.
    pub store: MemoryStore,
    pub config: Config,
}
