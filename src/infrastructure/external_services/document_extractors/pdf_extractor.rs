use async_trait::async_trait;
use lopdf::Document;
use lopdf::Object;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::path::{Path, PathBuf};

use crate::application::ports::document_extractor::{ExtractionError, PageText, TextExtractor};

/// Page-by-page text extraction with `lopdf`. Pages are decoded in parallel on the rayon
/// pool inside a blocking task.
pub struct PdfTextExtractor {
    password: String,
}

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self {
            password: String::new(),
        }
    }

    fn filter_func(object_id: (u32, u16), object: &mut Object) -> Option<((u32, u16), Object)> {
        static IGNORE: &[&[u8]] = &[
            b"BBox",
            b"Matrix",
            b"ColorSpace",
            b"Width",
            b"Height",
            b"BitsPerComponent",
            b"PTEX.FileName",
            b"PTEX.PageNumber",
            b"PTEX.InfoDict",
            b"ExtGState",
        ];

        if let Object::Dictionary(dict) = object {
            let keys_to_remove: Vec<_> = dict
                .iter()
                .filter(|(key, _)| IGNORE.contains(&key.as_slice()))
                .map(|(key, _)| key.clone())
                .collect();
            for key in keys_to_remove {
                dict.remove(&key);
            }
        }

        Some((object_id, object.to_owned()))
    }

    fn extract_blocking(path: PathBuf, password: String) -> Result<Vec<PageText>, ExtractionError> {
        let mut doc = Document::load_filtered(&path, Self::filter_func)
            .map_err(|e| ExtractionError::CorruptedFile(e.to_string()))?;

        if doc.is_encrypted() {
            doc.decrypt(&password).map_err(|_e| {
                ExtractionError::ExtractionFailed(
                    "Failed to decrypt PDF - invalid password".to_string(),
                )
            })?;
        }

        let page_numbers: Vec<u32> = doc.get_pages().into_keys().collect();
        if page_numbers.is_empty() {
            return Err(ExtractionError::CorruptedFile(
                "PDF has no pages".to_string(),
            ));
        }

        let mut extracted: Vec<(u32, String)> = page_numbers
            .into_par_iter()
            .map(|page_num| {
                let text = doc.extract_text(&[page_num]).unwrap_or_else(|e| {
                    tracing::warn!("Failed to extract text from page {}: {}", page_num, e);
                    String::new()
                });
                (page_num, text)
            })
            .collect();
        extracted.sort_by_key(|(page_num, _)| *page_num);

        Ok(extracted
            .into_iter()
            .enumerate()
            .map(|(idx, (_, text))| PageText::new(idx as u32 + 1, normalize_page_text(&text)))
            .collect())
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Drops trailing whitespace on each line and blank lines at either end of the page.
fn normalize_page_text(raw: &str) -> String {
    let lines: Vec<&str> = raw.lines().map(str::trim_end).collect();
    lines.join("\n").trim_matches('\n').to_string()
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract_pages(&self, file_path: &Path) -> Result<Vec<PageText>, ExtractionError> {
        let path = file_path.to_path_buf();
        let password = self.password.clone();

        let pages = tokio::task::spawn_blocking(move || Self::extract_blocking(path, password))
            .await
            .map_err(|e| ExtractionError::ExtractionFailed(e.to_string()))??;

        tracing::debug!(
            "Extracted {} pages from {}",
            pages.len(),
            file_path.display()
        );
        Ok(pages)
    }
}
