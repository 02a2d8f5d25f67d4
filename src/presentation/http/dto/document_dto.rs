use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::use_cases::{DeleteDocumentResponse, UploadDocumentResponse};
use crate::domain::entities::DocumentSummary;
use crate::domain::value_objects::{DocumentId, DocumentStatus};

#[derive(Debug, Serialize)]
pub struct UploadResponseDto {
    pub message: String,
    pub document_id: DocumentId,
    pub filename: String,
    pub chunks_count: usize,
    pub processing_time: f64,
}

impl From<UploadDocumentResponse> for UploadResponseDto {
    fn from(response: UploadDocumentResponse) -> Self {
        Self {
            message: format!(
                "Successfully processed {} into {} chunks",
                response.filename, response.chunks_count
            ),
            document_id: response.document_id,
            filename: response.filename,
            chunks_count: response.chunks_count,
            processing_time: response.processing_time,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentInfoDto {
    pub document_id: DocumentId,
    pub filename: String,
    pub upload_date: DateTime<Utc>,
    pub chunks_count: usize,
    pub status: DocumentStatus,
}

impl From<DocumentSummary> for DocumentInfoDto {
    fn from(summary: DocumentSummary) -> Self {
        Self {
            document_id: summary.document_id,
            filename: summary.filename,
            upload_date: summary.upload_date,
            chunks_count: summary.chunks_count,
            status: summary.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentListResponseDto {
    pub documents: Vec<DocumentInfoDto>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponseDto {
    pub message: String,
    pub document_id: DocumentId,
    pub chunks_removed: usize,
}

impl From<DeleteDocumentResponse> for DeleteResponseDto {
    fn from(response: DeleteDocumentResponse) -> Self {
        Self {
            message: format!("Document {} deleted", response.document_id),
            document_id: response.document_id,
            chunks_removed: response.chunks_removed,
        }
    }
}
