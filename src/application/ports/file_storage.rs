use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FileStorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Unique name inside the upload directory, `<uuid>_<sanitised original name>`.
    pub stored_name: String,
    pub path: PathBuf,
    pub size: u64,
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn store_file(
        &self,
        data: &[u8],
        file_name: &str,
    ) -> Result<StoredFile, FileStorageError>;

    async fn retrieve_file(&self, stored_name: &str) -> Result<Vec<u8>, FileStorageError>;

    /// Returns `false` when there was nothing to delete.
    async fn delete_file(&self, stored_name: &str) -> Result<bool, FileStorageError>;
}
