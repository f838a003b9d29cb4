pub mod error;
pub mod messages;
pub mod state;

use axum::{Router, routing::get};

use crate::error::ApiError;
use crate::state::AppState;

/// All HTTP routes with state applied. Transport layers (tracing, CORS) are
/// added by the binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/messages", get(messages::list_messages).post(messages::create_message))
        .route(
            "/messages/{id}",
            get(messages::get_message)
                .put(messages::update_message)
                .delete(messages::delete_message),
        )
        .route("/health", get(health))
        .fallback(not_found)
        .with_state(state)
}

/// GET /health — liveness check, no store access.
pub async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> ApiError {
    ApiError::NotFound("route not found".into())
}
