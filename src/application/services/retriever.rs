use std::sync::Arc;

use crate::application::ports::VectorIndex;
use crate::application::ports::vector_index::IndexError;
use crate::domain::entities::ScoredChunk;
use crate::domain::value_objects::DocumentId;

/// Similarity search plus a score cutoff. Scores are cosine similarities, so a result is kept
/// when `score >= threshold`.
pub struct Retriever {
    vector_index: Arc<dyn VectorIndex>,
}

impl Retriever {
    pub fn new(vector_index: Arc<dyn VectorIndex>) -> Self {
        Self { vector_index }
    }

    pub async fn retrieve(
        &self,
        query: &str,
        k: usize,
        document_id: Option<&DocumentId>,
        threshold: f32,
    ) -> Result<Vec<ScoredChunk>, IndexError> {
        let candidates = self.vector_index.search(query, k, document_id).await?;
        let candidate_count = candidates.len();

        let kept: Vec<ScoredChunk> = candidates
            .into_iter()
            .filter(|result| result.score >= threshold)
            .collect();

        tracing::debug!(
            "Retrieved {} of {} candidates above threshold {}",
            kept.len(),
            candidate_count,
            threshold
        );
        Ok(kept)
    }
}
