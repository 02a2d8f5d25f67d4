use axum::{Router, routing::get};
use std::sync::Arc;

use crate::presentation::http::handlers::ChunkHandler;

pub fn chunk_routes(chunk_handler: Arc<ChunkHandler>) -> Router {
    Router::new()
        .route("/api/chunks", get(ChunkHandler::list_chunks))
        .with_state(chunk_handler)
}
