use crate::application::ports::document_extractor::ExtractionError;
use crate::application::ports::file_storage::FileStorageError;
use crate::application::ports::vector_index::IndexError;
use crate::application::services::document_processor::DocumentProcessingError;

/// Failure taxonomy surfaced by the use cases. Language-model failures are absent on purpose:
/// the answer generator recovers from them locally.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("Index error: {0}")]
    Index(#[from] IndexError),
    #[error("Storage error: {0}")]
    Storage(#[from] FileStorageError),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<DocumentProcessingError> for AppError {
    fn from(error: DocumentProcessingError) -> Self {
        match error {
            DocumentProcessingError::Extraction(e) => AppError::Extraction(e),
            DocumentProcessingError::Index(e) => AppError::Index(e),
        }
    }
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Extraction(_) => "EXTRACTION_FAILED",
            AppError::Index(_) => "INDEX_ERROR",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
        }
    }
}
