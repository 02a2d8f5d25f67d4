use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::AppError;
use crate::application::use_cases::{
    DeleteDocumentUseCase, GetDocumentFileUseCase, ListDocumentsUseCase, UploadDocumentRequest,
    UploadDocumentUseCase,
};
use crate::domain::value_objects::DocumentId;
use crate::presentation::http::dto::{
    DeleteResponseDto, DocumentInfoDto, DocumentListResponseDto, UploadResponseDto,
};

const FILE_FIELD: &str = "file";

pub struct DocumentHandler {
    upload_use_case: Arc<UploadDocumentUseCase>,
    list_documents_use_case: Arc<ListDocumentsUseCase>,
    delete_document_use_case: Arc<DeleteDocumentUseCase>,
    get_document_file_use_case: Arc<GetDocumentFileUseCase>,
}

impl DocumentHandler {
    pub fn new(
        upload_use_case: Arc<UploadDocumentUseCase>,
        list_documents_use_case: Arc<ListDocumentsUseCase>,
        delete_document_use_case: Arc<DeleteDocumentUseCase>,
        get_document_file_use_case: Arc<GetDocumentFileUseCase>,
    ) -> Self {
        Self {
            upload_use_case,
            list_documents_use_case,
            delete_document_use_case,
            get_document_file_use_case,
        }
    }

    pub async fn upload_document(
        State(handler): State<Arc<DocumentHandler>>,
        mut multipart: Multipart,
    ) -> Result<impl IntoResponse, AppError> {
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::validation(format!("Invalid multipart body: {}", e)))?
        {
            if field.name() != Some(FILE_FIELD) {
                continue;
            }

            let file_name = field
                .file_name()
                .map(str::to_string)
                .ok_or_else(|| AppError::validation("Uploaded file has no file name"))?;
            let content_type = field.content_type().map(|ct| ct.to_string());
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Failed to read upload: {}", e)))?
                .to_vec();

            let response = handler
                .upload_use_case
                .execute(UploadDocumentRequest {
                    file_name,
                    file_data: data,
                    content_type,
                })
                .await?;

            return Ok((StatusCode::OK, Json(UploadResponseDto::from(response))));
        }

        Err(AppError::validation("No file provided in the request"))
    }

    pub async fn list_documents(
        State(handler): State<Arc<DocumentHandler>>,
    ) -> Result<impl IntoResponse, AppError> {
        let documents = handler.list_documents_use_case.execute().await?;

        Ok(Json(DocumentListResponseDto {
            documents: documents.into_iter().map(DocumentInfoDto::from).collect(),
        }))
    }

    pub async fn delete_document(
        State(handler): State<Arc<DocumentHandler>>,
        Path(document_id): Path<String>,
    ) -> Result<impl IntoResponse, AppError> {
        let response = handler
            .delete_document_use_case
            .execute(&DocumentId::from(document_id))
            .await?;

        Ok(Json(DeleteResponseDto::from(response)))
    }

    pub async fn get_document_file(
        State(handler): State<Arc<DocumentHandler>>,
        Path(document_id): Path<String>,
    ) -> Result<impl IntoResponse, AppError> {
        let file = handler
            .get_document_file_use_case
            .execute(&DocumentId::from(document_id))
            .await?;

        let disposition = format!("inline; filename=\"{}\"", file.display_name());
        Ok((
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            file.data,
        ))
    }
}
