use std::sync::Arc;

use uuid::Uuid;

use crate::application::AppError;
use crate::application::ports::{FileStorage, VectorIndex};
use crate::domain::value_objects::DocumentId;

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteDocumentResponse {
    pub document_id: DocumentId,
    pub chunks_removed: usize,
    pub file_removed: bool,
}

pub struct DeleteDocumentUseCase {
    vector_index: Arc<dyn VectorIndex>,
    file_storage: Arc<dyn FileStorage>,
}

impl DeleteDocumentUseCase {
    pub fn new(vector_index: Arc<dyn VectorIndex>, file_storage: Arc<dyn FileStorage>) -> Self {
        Self {
            vector_index,
            file_storage,
        }
    }

    /// Removes every chunk of the document, then its stored file. A file that is already
    /// gone is logged and does not fail the deletion.
    pub async fn execute(
        &self,
        document_id: &DocumentId,
    ) -> Result<DeleteDocumentResponse, AppError> {
        let records = self.vector_index.records(Some(document_id)).await?;
        let Some(first) = records.first() else {
            return Err(AppError::not_found(format!("Document {}", document_id)));
        };
        let stored_name = first.chunk.filename().to_string();

        let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();
        let chunks_removed = self.vector_index.remove(&ids).await?;

        let file_removed = match self.file_storage.delete_file(&stored_name).await {
            Ok(true) => true,
            Ok(false) => {
                tracing::warn!(
                    "Stored file {} for document {} was already missing",
                    stored_name,
                    document_id
                );
                false
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to delete stored file {} for document {}: {}",
                    stored_name,
                    document_id,
                    e
                );
                false
            }
        };

        tracing::info!(
            "Deleted document {} ({} chunks)",
            document_id,
            chunks_removed
        );

        Ok(DeleteDocumentResponse {
            document_id: document_id.clone(),
            chunks_removed,
            file_removed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::{
        ListDocumentsUseCase, UploadDocumentRequest, UploadDocumentResponse,
        UploadDocumentUseCase,
    };
    use crate::test_support::{TestWorkspace, filler_text, pdf_bytes};

    async fn upload(workspace: &TestWorkspace, name: &str, text: &str) -> UploadDocumentResponse {
        UploadDocumentUseCase::new(workspace.storage.clone(), workspace.processor.clone(), 1 << 20)
            .execute(UploadDocumentRequest {
                file_name: name.to_string(),
                file_data: pdf_bytes(&[text]),
                content_type: None,
            })
            .await
            .unwrap()
    }

    fn use_case(workspace: &TestWorkspace) -> DeleteDocumentUseCase {
        DeleteDocumentUseCase::new(workspace.index.clone(), workspace.storage.clone())
    }

    #[tokio::test]
    async fn test_delete_removes_chunks_and_file() {
        let workspace = TestWorkspace::new().await;
        let long_page = filler_text(2500);
        let doomed = upload(&workspace, "doomed.pdf", &long_page).await;
        let kept = upload(&workspace, "kept.pdf", "Cash position").await;

        let response = use_case(&workspace)
            .execute(&doomed.document_id)
            .await
            .unwrap();

        assert_eq!(response.chunks_removed, 3);
        assert!(response.file_removed);
        assert!(
            workspace
                .index
                .records(Some(&doomed.document_id))
                .await
                .unwrap()
                .is_empty()
        );
        assert!(
            !workspace
                .storage
                .base_path()
                .join(&doomed.stored_filename)
                .exists()
        );

        let documents = ListDocumentsUseCase::new(workspace.index.clone())
            .execute()
            .await
            .unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].document_id, kept.document_id);
    }

    #[tokio::test]
    async fn test_unknown_document_is_not_found() {
        let workspace = TestWorkspace::new().await;
        upload(&workspace, "report.pdf", "Revenue").await;

        let result = use_case(&workspace)
            .execute(&DocumentId::from("missing"))
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(workspace.index.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_still_deletes_chunks() {
        let workspace = TestWorkspace::new().await;
        let uploaded = upload(&workspace, "report.pdf", "Revenue").await;
        std::fs::remove_file(
            workspace
                .storage
                .base_path()
                .join(&uploaded.stored_filename),
        )
        .unwrap();

        let response = use_case(&workspace)
            .execute(&uploaded.document_id)
            .await
            .unwrap();

        assert_eq!(response.chunks_removed, 1);
        assert!(!response.file_removed);
        assert_eq!(workspace.index.count().await.unwrap(), 0);
    }
}
