use std::sync::Arc;

use crate::config::Config;
use crate::evaluation::Evaluator;
use crate::pipeline::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub session: SessionStore,
    /// Production: `LlmEvaluator`. Tests swap in a scripted one.
    pub evaluator: Arc<dyn Evaluator>,
    pub config: Config,
}
