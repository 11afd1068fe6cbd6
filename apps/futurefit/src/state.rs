use std::sync::Arc;

use crate::analysis::analyzer::ResumeAnalyzer;
use crate::config::Config;
use crate::session::orchestrator::Orchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable analyzer. Default: GeminiAnalyzer. Tests swap in canned replies.
    pub analyzer: Arc<dyn ResumeAnalyzer>,
    /// Owns the in-memory sessions behind the browser UI.
    pub orchestrator: Orchestrator,
    pub config: Config,
}

impl AppState {
    pub fn new(analyzer: Arc<dyn ResumeAnalyzer>, config: Config) -> Self {
        Self {
            orchestrator: Orchestrator::new(Arc::clone(&analyzer), &config),
            analyzer,
            config,
        }
    }
}
