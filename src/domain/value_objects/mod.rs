pub mod document_id;
pub mod document_status;

pub use document_id::DocumentId;
pub use document_status::DocumentStatus;
