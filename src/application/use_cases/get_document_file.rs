use std::sync::Arc;

use crate::application::AppError;
use crate::application::ports::file_storage::FileStorageError;
use crate::application::ports::{FileStorage, VectorIndex};
use crate::domain::value_objects::DocumentId;

#[derive(Debug, Clone)]
pub struct DocumentFile {
    pub stored_filename: String,
    pub data: Vec<u8>,
}

impl DocumentFile {
    /// The client's file name, i.e. the stored name without its `<uuid>_` prefix.
    pub fn display_name(&self) -> &str {
        match self.stored_filename.split_once('_') {
            Some((prefix, rest)) if uuid::Uuid::parse_str(prefix).is_ok() && !rest.is_empty() => {
                rest
            }
            _ => &self.stored_filename,
        }
    }
}

pub struct GetDocumentFileUseCase {
    vector_index: Arc<dyn VectorIndex>,
    file_storage: Arc<dyn FileStorage>,
}

impl GetDocumentFileUseCase {
    pub fn new(vector_index: Arc<dyn VectorIndex>, file_storage: Arc<dyn FileStorage>) -> Self {
        Self {
            vector_index,
            file_storage,
        }
    }

    pub async fn execute(&self, document_id: &DocumentId) -> Result<DocumentFile, AppError> {
        let records = self.vector_index.records(Some(document_id)).await?;
        let stored_filename = records
            .first()
            .map(|r| r.chunk.filename().to_string())
            .ok_or_else(|| AppError::not_found(format!("Document {}", document_id)))?;

        let data = match self.file_storage.retrieve_file(&stored_filename).await {
            Ok(data) => data,
            Err(FileStorageError::FileNotFound(_)) => {
                return Err(AppError::not_found(format!(
                    "File for document {}",
                    document_id
                )));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(DocumentFile {
            stored_filename,
            data,
        })
    }
}
