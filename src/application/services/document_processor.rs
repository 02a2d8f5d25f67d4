use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::application::ports::document_extractor::ExtractionError;
use crate::application::ports::vector_index::IndexError;
use crate::application::ports::{TextExtractor, VectorIndex};
use crate::application::services::Chunker;
use crate::domain::value_objects::DocumentId;

#[derive(Debug, thiserror::Error)]
pub enum DocumentProcessingError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Index(#[from] IndexError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngestionReport {
    pub document_id: DocumentId,
    pub filename: String,
    pub pages: usize,
    pub chunks_count: usize,
    pub processing_time: f64,
}

/// Extract, chunk and index one stored PDF.
pub struct DocumentProcessorService {
    text_extractor: Arc<dyn TextExtractor>,
    chunker: Chunker,
    vector_index: Arc<dyn VectorIndex>,
}

impl DocumentProcessorService {
    pub fn new(
        text_extractor: Arc<dyn TextExtractor>,
        chunker: Chunker,
        vector_index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            text_extractor,
            chunker,
            vector_index,
        }
    }

    /// Nothing reaches the index unless extraction succeeded, and the index add is
    /// all-or-nothing, so a failed ingest leaves no chunks behind. A document without any
    /// text is an extraction failure: it would have no chunks to be listed or deleted by.
    pub async fn ingest(
        &self,
        file_path: &Path,
        document_id: &DocumentId,
        filename: &str,
    ) -> Result<IngestionReport, DocumentProcessingError> {
        let start_time = Instant::now();

        let pages = self.text_extractor.extract_pages(file_path).await?;
        let upload_date = chrono::Utc::now().to_rfc3339();
        let chunks = self
            .chunker
            .chunk(&pages, document_id, filename, Some(upload_date.as_str()));

        if chunks.is_empty() {
            tracing::warn!(
                "Document {} ({}) produced no text; nothing was indexed",
                document_id,
                filename
            );
            return Err(ExtractionError::NoText(filename.to_string()).into());
        }

        self.vector_index.add(&chunks).await?;

        let processing_time = start_time.elapsed().as_secs_f64();
        tracing::info!(
            "Processed {} ({} pages, {} chunks) in {:.3}s",
            filename,
            pages.len(),
            chunks.len(),
            processing_time
        );

        Ok(IngestionReport {
            document_id: document_id.clone(),
            filename: filename.to_string(),
            pages: pages.len(),
            chunks_count: chunks.len(),
            processing_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::document_extractor::PageText;
    use crate::infrastructure::vector_store::LocalVectorStore;
    use crate::test_support::{FlakyEmbeddingProvider, HashEmbeddingProvider, filler_text};
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct StaticExtractor {
        pages: Vec<String>,
    }

    #[async_trait]
    impl TextExtractor for StaticExtractor {
        async fn extract_pages(&self, _file_path: &Path) -> Result<Vec<PageText>, ExtractionError> {
            Ok(self
                .pages
                .iter()
                .enumerate()
                .map(|(i, text)| PageText::new(i as u32 + 1, text.clone()))
                .collect())
        }
    }

    struct BrokenExtractor;

    #[async_trait]
    impl TextExtractor for BrokenExtractor {
        async fn extract_pages(&self, _file_path: &Path) -> Result<Vec<PageText>, ExtractionError> {
            Err(ExtractionError::CorruptedFile("not a pdf".to_string()))
        }
    }

    fn processor(
        extractor: Arc<dyn TextExtractor>,
        index: Arc<dyn VectorIndex>,
    ) -> DocumentProcessorService {
        DocumentProcessorService::new(extractor, Chunker::with_sizes(1000, 200).unwrap(), index)
    }

    #[tokio::test]
    async fn test_two_page_document_chunk_counts() {
        let dir = TempDir::new().unwrap();
        let index = Arc::new(
            LocalVectorStore::open(dir.path(), Arc::new(HashEmbeddingProvider::new()))
                .await
                .unwrap(),
        );
        let extractor = Arc::new(StaticExtractor {
            pages: vec![filler_text(2500), filler_text(300)],
        });
        let service = processor(extractor, index.clone());
        let document_id = DocumentId::generate();

        let report = service
            .ingest(Path::new("report.pdf"), &document_id, "report.pdf")
            .await
            .unwrap();

        assert_eq!(report.pages, 2);
        assert_eq!(report.chunks_count, 4);

        let records = index.records(Some(&document_id)).await.unwrap();
        let first_page = records
            .iter()
            .filter(|r| r.chunk.page_number() == 1)
            .count();
        let second_page = records
            .iter()
            .filter(|r| r.chunk.page_number() == 2)
            .count();
        assert_eq!(first_page, 3);
        assert_eq!(second_page, 1);
        assert!(records.iter().all(|r| r.chunk.filename() == "report.pdf"));
        assert!(records.iter().all(|r| r.chunk.metadata().upload_date.is_some()));
    }

    #[tokio::test]
    async fn test_blank_document_is_rejected() {
        let dir = TempDir::new().unwrap();
        let embeddings = Arc::new(HashEmbeddingProvider::new());
        let index = Arc::new(
            LocalVectorStore::open(dir.path(), embeddings.clone())
                .await
                .unwrap(),
        );
        let extractor = Arc::new(StaticExtractor {
            pages: vec![String::new(), "   \n".to_string()],
        });
        let service = processor(extractor, index.clone());

        let result = service
            .ingest(Path::new("blank.pdf"), &DocumentId::generate(), "blank.pdf")
            .await;

        assert!(matches!(
            result,
            Err(DocumentProcessingError::Extraction(ExtractionError::NoText(_)))
        ));
        assert_eq!(index.count().await.unwrap(), 0);
        assert_eq!(embeddings.batch_calls(), 0);
    }

    #[tokio::test]
    async fn test_extraction_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let index = Arc::new(
            LocalVectorStore::open(dir.path(), Arc::new(HashEmbeddingProvider::new()))
                .await
                .unwrap(),
        );
        let service = processor(Arc::new(BrokenExtractor), index.clone());

        let result = service
            .ingest(Path::new("bad.pdf"), &DocumentId::generate(), "bad.pdf")
            .await;

        assert!(matches!(result, Err(DocumentProcessingError::Extraction(_))));
        assert_eq!(index.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_embedding_failure_leaves_index_untouched() {
        let dir = TempDir::new().unwrap();
        let index = Arc::new(
            LocalVectorStore::open(dir.path(), Arc::new(FlakyEmbeddingProvider::new(1)))
                .await
                .unwrap(),
        );
        // 30 windows need three embedding batches; the second one fails.
        let extractor = Arc::new(StaticExtractor {
            pages: (0..30).map(|_| filler_text(100)).collect(),
        });
        let service = processor(extractor, index.clone());

        let result = service
            .ingest(Path::new("big.pdf"), &DocumentId::generate(), "big.pdf")
            .await;

        assert!(matches!(result, Err(DocumentProcessingError::Index(_))));
        assert_eq!(index.count().await.unwrap(), 0);
    }
}
