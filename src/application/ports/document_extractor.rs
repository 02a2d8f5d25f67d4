use async_trait::async_trait;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Corrupted file: {0}")]
    CorruptedFile(String),
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("No extractable text in {0}")]
    NoText(String),
}

/// Raw text of one page. `page_number` is 1-based and contiguous across a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub page_number: u32,
    pub text: String,
}

impl PageText {
    pub fn new(page_number: u32, text: impl Into<String>) -> Self {
        Self {
            page_number,
            text: text.into(),
        }
    }
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Every page in document order; pages without text yield an empty string.
    async fn extract_pages(&self, file_path: &Path) -> Result<Vec<PageText>, ExtractionError>;
}
