use crate::config::Config;
use crate::review::session::ReviewOrchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Owns the single review session and the AI readiness gate.
    pub review: ReviewOrchestrator,
    pub config: Config,
}
