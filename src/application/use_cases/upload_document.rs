use std::path::Path;
use std::sync::Arc;

use crate::application::AppError;
use crate::application::ports::FileStorage;
use crate::application::services::DocumentProcessorService;
use crate::domain::value_objects::DocumentId;

const PDF_MAGIC: &[u8] = b"%PDF";

#[derive(Debug, Clone)]
pub struct UploadDocumentRequest {
    pub file_name: String,
    pub file_data: Vec<u8>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UploadDocumentResponse {
    pub document_id: DocumentId,
    pub filename: String,
    pub stored_filename: String,
    pub chunks_count: usize,
    pub processing_time: f64,
}

pub struct UploadDocumentUseCase {
    file_storage: Arc<dyn FileStorage>,
    document_processor: Arc<DocumentProcessorService>,
    max_upload_bytes: usize,
}

impl UploadDocumentUseCase {
    pub fn new(
        file_storage: Arc<dyn FileStorage>,
        document_processor: Arc<DocumentProcessorService>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            file_storage,
            document_processor,
            max_upload_bytes,
        }
    }

    pub async fn execute(
        &self,
        request: UploadDocumentRequest,
    ) -> Result<UploadDocumentResponse, AppError> {
        self.validate(&request)?;

        let stored = self
            .file_storage
            .store_file(&request.file_data, &request.file_name)
            .await?;
        let document_id = DocumentId::generate();

        tracing::info!(
            "Stored upload {} as {} ({} bytes)",
            request.file_name,
            stored.stored_name,
            stored.size
        );

        match self
            .document_processor
            .ingest(&stored.path, &document_id, &stored.stored_name)
            .await
        {
            Ok(report) => Ok(UploadDocumentResponse {
                document_id,
                filename: request.file_name,
                stored_filename: stored.stored_name,
                chunks_count: report.chunks_count,
                processing_time: report.processing_time,
            }),
            Err(e) => {
                tracing::error!("Failed to process {}: {}", request.file_name, e);
                self.discard(&stored.stored_name).await;
                Err(e.into())
            }
        }
    }

    fn validate(&self, request: &UploadDocumentRequest) -> Result<(), AppError> {
        if request.file_name.trim().is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }

        if request.file_data.is_empty() {
            return Err(AppError::validation("File data cannot be empty"));
        }

        if request.file_data.len() > self.max_upload_bytes {
            return Err(AppError::validation(format!(
                "File exceeds the maximum upload size of {} bytes",
                self.max_upload_bytes
            )));
        }

        if !is_pdf(&request.file_name, request.content_type.as_deref()) {
            return Err(AppError::validation("Only PDF files are supported"));
        }

        if !request.file_data.starts_with(PDF_MAGIC) {
            return Err(AppError::validation("File content is not a PDF document"));
        }

        Ok(())
    }

    async fn discard(&self, stored_name: &str) {
        match self.file_storage.delete_file(stored_name).await {
            Ok(_) => tracing::debug!("Removed stored upload {}", stored_name),
            Err(e) => tracing::warn!("Failed to remove stored upload {}: {}", stored_name, e),
        }
    }
}

fn is_pdf(file_name: &str, content_type: Option<&str>) -> bool {
    let by_extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    let by_content_type = content_type
        .is_some_and(|ct| ct.trim().eq_ignore_ascii_case("application/pdf"));

    by_extension || by_content_type
}
