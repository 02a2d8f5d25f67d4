use axum::{Router, routing::post};
use std::sync::Arc;

use crate::presentation::http::handlers::ChatHandler;

pub fn chat_routes(chat_handler: Arc<ChatHandler>) -> Router {
    Router::new()
        .route("/api/chat", post(ChatHandler::chat))
        .with_state(chat_handler)
}
