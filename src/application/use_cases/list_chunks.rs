use std::sync::Arc;

use crate::application::AppError;
use crate::application::ports::VectorIndex;
use crate::domain::entities::StoredChunk;
use crate::domain::value_objects::DocumentId;

pub const DEFAULT_CHUNK_LIMIT: usize = 100;
pub const MAX_CHUNK_LIMIT: usize = 1000;

#[derive(Debug, Clone)]
pub struct ListChunksRequest {
    pub document_id: Option<DocumentId>,
    pub skip: usize,
    pub limit: usize,
}

impl Default for ListChunksRequest {
    fn default() -> Self {
        Self {
            document_id: None,
            skip: 0,
            limit: DEFAULT_CHUNK_LIMIT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListChunksResponse {
    pub chunks: Vec<StoredChunk>,
    pub total_count: usize,
}

pub struct ListChunksUseCase {
    vector_index: Arc<dyn VectorIndex>,
}

impl ListChunksUseCase {
    pub fn new(vector_index: Arc<dyn VectorIndex>) -> Self {
        Self { vector_index }
    }

    pub async fn execute(&self, request: ListChunksRequest) -> Result<ListChunksResponse, AppError> {
        if request.limit == 0 || request.limit > MAX_CHUNK_LIMIT {
            return Err(AppError::validation(format!(
                "Limit must be between 1 and {}",
                MAX_CHUNK_LIMIT
            )));
        }

        let document_id = request.document_id.filter(|id| !id.is_blank());
        let records = self.vector_index.records(document_id.as_ref()).await?;
        let total_count = records.len();

        let chunks = records
            .into_iter()
            .skip(request.skip)
            .take(request.limit)
            .collect();

        Ok(ListChunksResponse {
            chunks,
            total_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Chunk, ChunkMetadata};
    use crate::test_support::TestWorkspace;

    async fn seed(workspace: &TestWorkspace) {
        let chunks: Vec<Chunk> = (0..5)
            .map(|i| {
                Chunk::new(
                    format!("chunk {i}"),
                    ChunkMetadata {
                        document_id: DocumentId::from(if i < 3 { "a" } else { "b" }),
                        filename: "x.pdf".to_string(),
                        page_number: 1,
                        chunk_index: i,
                        upload_date: None,
                    },
                )
            })
            .collect();
        workspace.index.add(&chunks).await.unwrap();
    }

    #[tokio::test]
    async fn test_pagination_keeps_total() {
        let workspace = TestWorkspace::new().await;
        seed(&workspace).await;

        let response = ListChunksUseCase::new(workspace.index.clone())
            .execute(ListChunksRequest {
                skip: 1,
                limit: 2,
                ..ListChunksRequest::default()
            })
            .await
            .unwrap();

        assert_eq!(response.total_count, 5);
        let contents: Vec<&str> = response.chunks.iter().map(|c| c.chunk.content()).collect();
        assert_eq!(contents, vec!["chunk 1", "chunk 2"]);
    }

    #[tokio::test]
    async fn test_document_filter() {
        let workspace = TestWorkspace::new().await;
        seed(&workspace).await;

        let response = ListChunksUseCase::new(workspace.index.clone())
            .execute(ListChunksRequest {
                document_id: Some(DocumentId::from("b")),
                ..ListChunksRequest::default()
            })
            .await
            .unwrap();

        assert_eq!(response.total_count, 2);
        assert!(
            response
                .chunks
                .iter()
                .all(|c| c.chunk.document_id().as_str() == "b")
        );
    }

    #[tokio::test]
    async fn test_limit_bounds() {
        let workspace = TestWorkspace::new().await;
        let use_case = ListChunksUseCase::new(workspace.index.clone());

        for limit in [0, MAX_CHUNK_LIMIT + 1] {
            let result = use_case
                .execute(ListChunksRequest {
                    limit,
                    ..ListChunksRequest::default()
                })
                .await;
            assert!(matches!(result, Err(AppError::Validation(_))));
        }
    }
}
