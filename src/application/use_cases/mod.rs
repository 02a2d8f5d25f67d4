pub mod ask_question;
pub mod delete_document;
pub mod get_document_file;
pub mod list_chunks;
pub mod list_documents;
pub mod upload_document;

pub use ask_question::{AskQuestionRequest, AskQuestionUseCase};
pub use delete_document::{DeleteDocumentResponse, DeleteDocumentUseCase};
pub use get_document_file::{DocumentFile, GetDocumentFileUseCase};
pub use list_chunks::{ListChunksRequest, ListChunksResponse, ListChunksUseCase};
pub use list_documents::ListDocumentsUseCase;
pub use upload_document::{UploadDocumentRequest, UploadDocumentResponse, UploadDocumentUseCase};
