use crate::application::ports::document_extractor::PageText;
use crate::domain::entities::{Chunk, ChunkMetadata};
use crate::domain::value_objects::DocumentId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChunkConfigError {
    #[error("chunk_size must be positive")]
    ZeroChunkSize,
    #[error("chunk_overlap must be positive")]
    ZeroOverlap,
    #[error("chunk_overlap ({overlap}) must be smaller than chunk_size ({size})")]
    OverlapTooLarge { size: usize, overlap: usize },
}

pub trait TextSplitter: Send + Sync {
    fn split_text(&self, text: &str) -> Vec<String>;
}

/// Greedy fixed-window splitter. Sizes are counted in characters, not bytes.
///
/// Each window holds at most `chunk_size` characters and ends on the strongest boundary found
/// in its second half (paragraph, line, sentence, word), falling back to a hard cut. The next
/// window starts exactly `chunk_overlap` characters before the previous end.
#[derive(Debug, Clone)]
pub struct OverlappingTextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<&'static str>,
}

impl OverlappingTextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, ChunkConfigError> {
        if chunk_size == 0 {
            return Err(ChunkConfigError::ZeroChunkSize);
        }
        if chunk_overlap == 0 {
            return Err(ChunkConfigError::ZeroOverlap);
        }
        if chunk_overlap >= chunk_size {
            return Err(ChunkConfigError::OverlapTooLarge {
                size: chunk_size,
                overlap: chunk_overlap,
            });
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators: vec![
                "\n\n", // Paragraphs
                "\n",   // Lines
                ". ",   // Sentences
                " ",    // Words
            ],
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// End (exclusive) of the window starting at `start`. Only called when more than
    /// `chunk_size` characters remain.
    fn find_break(&self, chars: &[char], start: usize) -> usize {
        let hard_end = start + self.chunk_size;
        // Past the overlap so the next window always advances.
        let min_end = start + std::cmp::max(self.chunk_overlap + 1, self.chunk_size / 2);

        for separator in &self.separators {
            let sep: Vec<char> = separator.chars().collect();
            let mut end = hard_end;
            while end >= min_end && end >= start + sep.len() {
                if chars[end - sep.len()..end] == sep[..] {
                    return end;
                }
                end -= 1;
            }
        }

        hard_end
    }
}

impl TextSplitter for OverlappingTextSplitter {
    fn split_text(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = if chars.len() - start <= self.chunk_size {
                chars.len()
            } else {
                self.find_break(&chars, start)
            };

            let window: String = chars[start..end].iter().collect();
            if !window.trim().is_empty() {
                chunks.push(window);
            }

            if end == chars.len() {
                break;
            }
            start = end - self.chunk_overlap;
        }

        chunks
    }
}

/// Turns extracted pages into chunks tagged with page and document metadata.
pub struct Chunker {
    splitter: Box<dyn TextSplitter>,
}

impl Chunker {
    pub fn new(splitter: Box<dyn TextSplitter>) -> Self {
        Self { splitter }
    }

    pub fn with_sizes(chunk_size: usize, chunk_overlap: usize) -> Result<Self, ChunkConfigError> {
        let splitter = OverlappingTextSplitter::new(chunk_size, chunk_overlap)?;
        Ok(Self::new(Box::new(splitter)))
    }

    pub fn chunk(
        &self,
        pages: &[PageText],
        document_id: &DocumentId,
        filename: &str,
        upload_date: Option<&str>,
    ) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        for page in pages {
            if page.text.trim().is_empty() {
                continue;
            }

            for (idx, content) in self.splitter.split_text(&page.text).into_iter().enumerate() {
                chunks.push(Chunk::new(
                    content,
                    ChunkMetadata {
                        document_id: document_id.clone(),
                        filename: filename.to_string(),
                        page_number: page.page_number,
                        chunk_index: idx as u32,
                        upload_date: upload_date.map(str::to_string),
                    },
                ));
            }
        }

        tracing::debug!(
            "Split {} pages of {} into {} chunks",
            pages.len(),
            document_id,
            chunks.len()
        );
        chunks
    }
}
