use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::DocumentHandler;

pub fn document_routes(document_handler: Arc<DocumentHandler>) -> Router {
    Router::new()
        .route("/api/upload", post(DocumentHandler::upload_document))
        .route("/api/documents", get(DocumentHandler::list_documents))
        .route(
            "/api/documents/{document_id}",
            delete(DocumentHandler::delete_document),
        )
        .route(
            "/api/documents/{document_id}/file",
            get(DocumentHandler::get_document_file),
        )
        .with_state(document_handler)
}
