use std::sync::Arc;

use crate::config::Config;
use crate::extraction::TextExtractor;
use crate::llm_client::LanguageModel;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; nothing here changes between requests.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable LLM backend. Default: `GeminiClient`.
    pub llm: Arc<dyn LanguageModel>,
    pub extractor: TextExtractor,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, llm: Arc<dyn LanguageModel>) -> Self {
        Self {
            extractor: TextExtractor::new(config.scratch_dir.clone()),
            llm,
            config,
        }
    }
}
