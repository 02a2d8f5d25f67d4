use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::application::ports::EmbeddingProvider;
use crate::application::ports::embedding_provider::{BatchEmbeddingRequest, EmbeddingRequest};
use crate::application::ports::vector_index::{IndexError, VectorIndex};
use crate::domain::entities::{Chunk, ChunkMetadata, ScoredChunk, StoredChunk};
use crate::domain::value_objects::DocumentId;

const INDEX_FILE: &str = "chunks.json";
const INDEX_VERSION: u32 = 1;
const EMBEDDING_BATCH_SIZE: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexRecord {
    id: Uuid,
    content: String,
    embedding: Vec<f32>,
    metadata: ChunkMetadata,
}

impl IndexRecord {
    fn to_chunk(&self) -> Chunk {
        Chunk::new(self.content.clone(), self.metadata.clone())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct IndexFile {
    version: u32,
    records: Vec<IndexRecord>,
}

/// Vector index held in memory and mirrored to a single JSON file.
///
/// Mutations hold the write guard while the file is rewritten (temp file + rename), so
/// concurrent writers are serialised and readers only ever see complete record sets.
pub struct LocalVectorStore {
    persist_dir: PathBuf,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    records: RwLock<Vec<IndexRecord>>,
}

impl LocalVectorStore {
    /// Opens the store, loading `chunks.json` when it exists.
    pub async fn open(
        persist_dir: impl Into<PathBuf>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, IndexError> {
        let persist_dir = persist_dir.into();
        fs::create_dir_all(&persist_dir)
            .await
            .map_err(|e| IndexError::Persistence(e.to_string()))?;

        let records = load_records(&persist_dir.join(INDEX_FILE)).await?;
        tracing::info!(
            "Opened vector store at {} with {} records",
            persist_dir.display(),
            records.len()
        );

        Ok(Self {
            persist_dir,
            embedding_provider,
            records: RwLock::new(records),
        })
    }

    fn index_path(&self) -> PathBuf {
        self.persist_dir.join(INDEX_FILE)
    }

    async fn persist(&self, records: &[IndexRecord]) -> Result<(), IndexError> {
        let path = self.index_path();
        let tmp = path.with_extension("json.tmp");
        let file = IndexFile {
            version: INDEX_VERSION,
            records: records.to_vec(),
        };
        let bytes =
            serde_json::to_vec(&file).map_err(|e| IndexError::Persistence(e.to_string()))?;

        fs::write(&tmp, &bytes)
            .await
            .map_err(|e| IndexError::Persistence(format!("{}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| IndexError::Persistence(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    async fn embed_chunks(&self, chunks: &[Chunk]) -> Result<Vec<Vec<f32>>, IndexError> {
        let mut embeddings = Vec::with_capacity(chunks.len());

        for chunk_batch in chunks.chunks(EMBEDDING_BATCH_SIZE) {
            let texts: Vec<String> = chunk_batch
                .iter()
                .map(|chunk| chunk.content().to_string())
                .collect();

            let response = self
                .embedding_provider
                .generate_embeddings(BatchEmbeddingRequest { texts })
                .await?;

            if response.embeddings.len() != chunk_batch.len() {
                return Err(IndexError::EmbeddingCountMismatch {
                    expected: chunk_batch.len(),
                    actual: response.embeddings.len(),
                });
            }
            embeddings.extend(response.embeddings);
        }

        Ok(embeddings)
    }
}

async fn load_records(path: &Path) -> Result<Vec<IndexRecord>, IndexError> {
    if !fs::try_exists(path)
        .await
        .map_err(|e| IndexError::Persistence(e.to_string()))?
    {
        return Ok(Vec::new());
    }

    let bytes = fs::read(path)
        .await
        .map_err(|e| IndexError::Persistence(format!("{}: {}", path.display(), e)))?;
    let file: IndexFile = serde_json::from_slice(&bytes)
        .map_err(|e| IndexError::Corrupt(format!("{}: {}", path.display(), e)))?;

    if file.version != INDEX_VERSION {
        return Err(IndexError::Corrupt(format!(
            "unsupported index version {}",
            file.version
        )));
    }

    Ok(file.records)
}

/// Cosine similarity in [-1, 1]; 0.0 when either vector has zero magnitude or the
/// dimensions differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[async_trait]
impl VectorIndex for LocalVectorStore {
    async fn add(&self, chunks: &[Chunk]) -> Result<Vec<Uuid>, IndexError> {
        if chunks.is_empty() {
            tracing::info!("No chunks to add to the vector store");
            return Ok(Vec::new());
        }

        // Embedding happens before any state is touched, so a failure leaves nothing behind.
        let embeddings = self.embed_chunks(chunks).await?;

        let new_records: Vec<IndexRecord> = chunks
            .iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexRecord {
                id: Uuid::new_v4(),
                content: chunk.content().to_string(),
                embedding,
                metadata: chunk.metadata().clone(),
            })
            .collect();
        let ids = new_records.iter().map(|record| record.id).collect();

        let mut records = self.records.write().await;
        let mut updated = records.clone();
        updated.extend(new_records);
        self.persist(&updated).await?;
        *records = updated;

        tracing::info!(
            "Added {} chunks to the vector store ({} total)",
            chunks.len(),
            records.len()
        );
        Ok(ids)
    }

    async fn search(
        &self,
        query: &str,
        k: usize,
        document_id: Option<&DocumentId>,
    ) -> Result<Vec<ScoredChunk>, IndexError> {
        if query.trim().is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self
            .embedding_provider
            .generate_embedding(EmbeddingRequest {
                text: query.to_string(),
            })
            .await?
            .embedding;

        let records = self.records.read().await;
        let mut scored: Vec<ScoredChunk> = records
            .iter()
            .filter(|record| document_id.is_none_or(|id| &record.metadata.document_id == id))
            .map(|record| ScoredChunk {
                id: record.id,
                chunk: record.to_chunk(),
                score: cosine_similarity(&query_embedding, &record.embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);

        tracing::debug!("Vector search returned {} results", scored.len());
        Ok(scored)
    }

    async fn remove(&self, ids: &[Uuid]) -> Result<usize, IndexError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut records = self.records.write().await;
        let updated: Vec<IndexRecord> = records
            .iter()
            .filter(|record| !ids.contains(&record.id))
            .cloned()
            .collect();
        let removed = records.len() - updated.len();

        if removed > 0 {
            self.persist(&updated).await?;
            *records = updated;
        }

        tracing::info!("Removed {} records from the vector store", removed);
        Ok(removed)
    }

    async fn count(&self) -> Result<usize, IndexError> {
        Ok(self.records.read().await.len())
    }

    async fn records(
        &self,
        document_id: Option<&DocumentId>,
    ) -> Result<Vec<StoredChunk>, IndexError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|record| document_id.is_none_or(|id| &record.metadata.document_id == id))
            .map(|record| StoredChunk {
                id: record.id,
                chunk: record.to_chunk(),
            })
            .collect())
    }
}
