use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::DocumentId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub document_id: DocumentId,
    pub filename: String,
    pub page_number: u32,
    pub chunk_index: u32,
    /// RFC 3339 timestamp of the upload. Older index files may lack it.
    #[serde(default)]
    pub upload_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    content: String,
    metadata: ChunkMetadata,
}

impl Chunk {
    pub fn new(content: String, metadata: ChunkMetadata) -> Self {
        Self { content, metadata }
    }

    // Getters
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn metadata(&self) -> &ChunkMetadata {
        &self.metadata
    }

    pub fn document_id(&self) -> &DocumentId {
        &self.metadata.document_id
    }

    pub fn filename(&self) -> &str {
        &self.metadata.filename
    }

    pub fn page_number(&self) -> u32 {
        self.metadata.page_number
    }

    pub fn chunk_index(&self) -> u32 {
        self.metadata.chunk_index
    }
}

/// A chunk as held by the vector index, addressed by its internal record id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredChunk {
    pub id: Uuid,
    pub chunk: Chunk,
}

/// A search hit. `score` is cosine similarity: higher means more similar.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub id: Uuid,
    pub chunk: Chunk,
    pub score: f32,
}
