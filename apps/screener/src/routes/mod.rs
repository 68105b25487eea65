pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes();

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/status", get(handlers::handle_status))
        .route(
            "/api/v1/criteria/char-count",
            post(handlers::handle_char_count),
        )
        // Sessions
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_clear_session),
        )
        .route(
            "/api/v1/sessions/:id/analyze",
            post(handlers::handle_analyze),
        )
        // CSV downloads
        .route(
            "/api/v1/exports/:file_name",
            get(handlers::handle_download_export),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
