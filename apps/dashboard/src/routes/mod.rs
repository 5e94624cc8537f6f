pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::state::AppState;
use crate::views::handlers;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/overview", get(handlers::handle_overview))
        .route("/api/v1/rows", get(handlers::handle_rows))
        .route("/api/v1/filters", get(handlers::handle_filters))
        .route("/api/v1/profiles", get(handlers::handle_profiles))
        .route("/api/v1/timeline", get(handlers::handle_timeline))
        .route("/api/v1/analytics", get(handlers::handle_analytics))
        .route("/api/v1/dashboard", get(handlers::handle_dashboard))
        .route("/api/v1/dataset/reload", post(handlers::handle_reload))
        .fallback(not_found)
        .with_state(state)
}
