use async_trait::async_trait;
use uuid::Uuid;

use crate::application::ports::embedding_provider::EmbeddingProviderError;
use crate::domain::entities::{Chunk, ScoredChunk, StoredChunk};
use crate::domain::value_objects::DocumentId;

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingProviderError),
    #[error("Embedding count mismatch: expected {expected}, got {actual}")]
    EmbeddingCountMismatch { expected: usize, actual: usize },
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Corrupt index file: {0}")]
    Corrupt(String),
}

/// Durable store of chunk text, embeddings and metadata.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Embeds and persists every chunk before returning. All-or-nothing per call.
    async fn add(&self, chunks: &[Chunk]) -> Result<Vec<Uuid>, IndexError>;

    /// Nearest `k` records by cosine similarity, best first, optionally restricted to one
    /// document. A blank query yields no results.
    async fn search(
        &self,
        query: &str,
        k: usize,
        document_id: Option<&DocumentId>,
    ) -> Result<Vec<ScoredChunk>, IndexError>;

    /// Returns the number of records actually removed.
    async fn remove(&self, ids: &[Uuid]) -> Result<usize, IndexError>;

    async fn count(&self) -> Result<usize, IndexError>;

    /// Metadata scan in insertion order, without embeddings.
    async fn records(
        &self,
        document_id: Option<&DocumentId>,
    ) -> Result<Vec<StoredChunk>, IndexError>;
}
