pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/reviews", post(handlers::handle_review))
        .route("/api/v1/matches", post(handlers::handle_match))
        .route("/api/v1/rewrites", post(handlers::handle_rewrite))
        .route(
            "/api/v1/cover-letters",
            post(handlers::handle_cover_letter),
        )
        .route("/api/v1/analyses", get(handlers::handle_list_analyses))
        .route("/api/v1/analyses/:id", get(handlers::handle_get_analysis))
        .with_state(state)
}
