use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use sage_agent::PlanGenerator;
use sage_core::config::SageConfig;
use sage_store::SubjectStore;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: SageConfig,
    pub store: SubjectStore,
    /// None when startup model resolution failed — /api/chat answers 503
    /// until the process is restarted with a working provider.
    pub planner: Option<PlanGenerator>,
}

impl AppState {
    pub fn new(config: SageConfig, store: SubjectStore, planner: Option<PlanGenerator>) -> Self {
        Self {
            config,
            store,
            planner,
        }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route(
            "/api/exam",
            get(crate::http::exam::list_subjects).post(crate::http::exam::create_subject),
        )
        .route("/api/exam/{id}", delete(crate::http::exam::delete_subject))
        .route("/api/chat", post(crate::http::chat::chat_handler))
        .with_state(state)
        // The frontend is served from another origin during development.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
