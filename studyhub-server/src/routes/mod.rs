//! Route registration.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod chat;

/// Builds the application router over the shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat::chat))
        .route("/api/chat/history", get(chat::history))
        .route("/api/chat/quick-response", post(chat::quick_response))
        .route("/api/chat/search-knowledge", post(chat::search_knowledge))
        .route("/api/chat/clear-history", post(chat::clear_history))
        .route("/api/chat/status", get(chat::status))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
