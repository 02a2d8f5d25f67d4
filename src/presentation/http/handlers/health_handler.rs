use axum::{Json, extract::State, response::IntoResponse};
use std::sync::Arc;

use crate::application::AppError;
use crate::application::ports::VectorIndex;
use crate::presentation::http::dto::{HealthResponseDto, MessageResponseDto};

pub struct HealthHandler {
    vector_index: Arc<dyn VectorIndex>,
}

impl HealthHandler {
    pub fn new(vector_index: Arc<dyn VectorIndex>) -> Self {
        Self { vector_index }
    }

    pub async fn root() -> impl IntoResponse {
        Json(MessageResponseDto {
            message: "Financial document Q&A API".to_string(),
        })
    }

    pub async fn health(
        State(handler): State<Arc<HealthHandler>>,
    ) -> Result<impl IntoResponse, AppError> {
        let indexed_chunks = handler.vector_index.count().await?;

        Ok(Json(HealthResponseDto {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            indexed_chunks,
        }))
    }
}
