use std::sync::Arc;

use crate::config::Config;
use crate::extract::TextExtractor;
use crate::llm_client::Completer;
use crate::rate_limit::RateLimiter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub extractor: TextExtractor,
    /// Pluggable completion backend. Default: `LlmClient`; tests inject stubs.
    pub completer: Arc<dyn Completer>,
    /// Per-client counters for `/api/parse`, the only state shared across requests.
    pub rate_limiter: Arc<RateLimiter>,
    pub config: Config,
}
