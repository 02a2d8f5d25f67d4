use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::use_cases::list_chunks::DEFAULT_CHUNK_LIMIT;
use crate::domain::entities::{ChunkMetadata, StoredChunk};

#[derive(Debug, Deserialize)]
pub struct ChunkQueryDto {
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_CHUNK_LIMIT
}

#[derive(Debug, Serialize)]
pub struct ChunkDto {
    pub id: Uuid,
    pub content: String,
    pub page: u32,
    pub metadata: ChunkMetadata,
}

impl From<StoredChunk> for ChunkDto {
    fn from(stored: StoredChunk) -> Self {
        let metadata = stored.chunk.metadata().clone();
        Self {
            id: stored.id,
            content: stored.chunk.content().to_string(),
            page: metadata.page_number,
            metadata,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChunkListResponseDto {
    pub chunks: Vec<ChunkDto>,
    pub total_count: usize,
}
