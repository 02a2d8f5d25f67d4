use async_trait::async_trait;
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::file_storage::{FileStorage, FileStorageError, StoredFile};

const FALLBACK_NAME: &str = "document.pdf";

static INVALID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]").expect("valid file name pattern"));
static DOT_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.{2,}").expect("valid dot run pattern"));

/// Uploaded originals, one file per upload, flat inside `base_path`.
pub struct LocalFileStorage {
    base_path: PathBuf,
}

impl LocalFileStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    pub async fn ensure_directory_exists(&self) -> Result<(), FileStorageError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| FileStorageError::IoError(e.to_string()))
    }

    fn get_file_path(&self, stored_name: &str) -> Result<PathBuf, FileStorageError> {
        if stored_name.is_empty()
            || stored_name.contains('/')
            || stored_name.contains('\\')
            || stored_name.contains("..")
        {
            return Err(FileStorageError::InvalidPath(stored_name.to_string()));
        }
        Ok(self.base_path.join(stored_name))
    }
}

/// Keeps `[A-Za-z0-9._-]`, replaces everything else with `_` and collapses dot runs.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base_name = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .trim();
    let replaced = INVALID_CHARS.replace_all(base_name, "_");
    let collapsed = DOT_RUNS.replace_all(&replaced, ".");
    let cleaned = collapsed.trim_start_matches('.');

    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

fn map_io_error(stored_name: &str, error: std::io::Error) -> FileStorageError {
    match error.kind() {
        std::io::ErrorKind::NotFound => FileStorageError::FileNotFound(stored_name.to_string()),
        std::io::ErrorKind::PermissionDenied => {
            FileStorageError::PermissionDenied(stored_name.to_string())
        }
        _ => FileStorageError::IoError(error.to_string()),
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store_file(
        &self,
        data: &[u8],
        file_name: &str,
    ) -> Result<StoredFile, FileStorageError> {
        self.ensure_directory_exists().await?;

        let stored_name = format!("{}_{}", Uuid::new_v4(), sanitize_file_name(file_name));
        let file_path = self.get_file_path(&stored_name)?;

        fs::write(&file_path, data)
            .await
            .map_err(|e| map_io_error(&stored_name, e))?;

        tracing::debug!("Stored {} bytes at {}", data.len(), file_path.display());

        Ok(StoredFile {
            stored_name,
            path: file_path,
            size: data.len() as u64,
        })
    }

    async fn retrieve_file(&self, stored_name: &str) -> Result<Vec<u8>, FileStorageError> {
        let file_path = self.get_file_path(stored_name)?;

        fs::read(&file_path)
            .await
            .map_err(|e| map_io_error(stored_name, e))
    }

    async fn delete_file(&self, stored_name: &str) -> Result<bool, FileStorageError> {
        let file_path = self.get_file_path(stored_name)?;

        match fs::remove_file(&file_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(map_io_error(stored_name, e)),
        }
    }
}
