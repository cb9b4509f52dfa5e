pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::ats::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/ats/suggestions", post(handlers::handle_suggestions))
        .route("/api/v1/ats/score", post(handlers::handle_score))
        .route("/api/v1/ats/analyze", post(handlers::handle_analyze))
        .route("/api/v1/ats/apply", post(handlers::handle_apply))
        .with_state(state)
}
