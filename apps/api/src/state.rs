use std::sync::Arc;

use crate::config::Config;
use crate::extraction::TextExtractor;
use crate::structuring::ResumeStructurer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub extractor: TextExtractor,
    /// Pluggable structurer. Default: LlmResumeStructurer.
    pub structurer: Arc<dyn ResumeStructurer>,
    pub config: Config,
}
