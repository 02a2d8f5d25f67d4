use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::AppError;
use crate::application::use_cases::{ListChunksRequest, ListChunksUseCase};
use crate::domain::value_objects::DocumentId;
use crate::presentation::http::dto::{ChunkDto, ChunkListResponseDto, ChunkQueryDto};

pub struct ChunkHandler {
    list_chunks_use_case: Arc<ListChunksUseCase>,
}

impl ChunkHandler {
    pub fn new(list_chunks_use_case: Arc<ListChunksUseCase>) -> Self {
        Self {
            list_chunks_use_case,
        }
    }

    pub async fn list_chunks(
        State(handler): State<Arc<ChunkHandler>>,
        Query(query): Query<ChunkQueryDto>,
    ) -> Result<impl IntoResponse, AppError> {
        let response = handler
            .list_chunks_use_case
            .execute(ListChunksRequest {
                document_id: query.document_id.map(DocumentId::from),
                skip: query.skip,
                limit: query.limit,
            })
            .await?;

        Ok(Json(ChunkListResponseDto {
            chunks: response.chunks.into_iter().map(ChunkDto::from).collect(),
            total_count: response.total_count,
        }))
    }
}
