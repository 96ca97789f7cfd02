//! Router configuration

mod assistant;
mod documents;
mod health;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub use assistant::AssistantRequest;
pub use documents::UploadResponse;

/// Create the router with all routes.
pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/upload", post(documents::upload))
        .route("/verify", post(documents::verify))
        .route("/assistant", post(assistant::ask))
        .route("/health", get(health::health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
