pub mod health;

use axum::{
    http::Uri,
    routing::{delete, get, post},
    Router,
};

use crate::errors::AppError;
use crate::screening::handlers;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/requirements/parse",
            post(handlers::handle_parse_requirements),
        )
        .route("/api/v1/skills/match", post(handlers::handle_match_skills))
        .route(
            "/api/v1/skills/match/cache",
            delete(handlers::handle_clear_match_cache),
        )
        .route("/api/v1/fit/score", post(handlers::handle_fit_score))
        .route("/api/v1/screenings", post(handlers::handle_screening))
        .fallback(not_found)
        .with_state(state)
}
