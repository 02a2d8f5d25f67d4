//! In-process stand-ins for the embedding service, the language model and PDF fixtures.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use tempfile::TempDir;

use crate::application::ports::embedding_provider::{
    BatchEmbeddingRequest, BatchEmbeddingResponse, EmbeddingProvider, EmbeddingProviderError,
    EmbeddingRequest, EmbeddingResponse,
};
use crate::application::ports::language_model::{
    CompletionRequest, LanguageModel, LanguageModelError,
};
use crate::application::services::{Chunker, DocumentProcessorService};
use crate::infrastructure::external_services::PdfTextExtractor;
use crate::infrastructure::file_system::LocalFileStorage;
use crate::infrastructure::vector_store::LocalVectorStore;

const DIMENSIONS: usize = 64;

/// Bag-of-words embedding: each lowercase word is hashed into one of 64 buckets.
/// Texts sharing words get a positive cosine similarity, disjoint texts get zero.
#[derive(Default)]
pub struct HashEmbeddingProvider {
    batch_calls: AtomicUsize,
}

impl HashEmbeddingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    pub fn embed(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; DIMENSIONS];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let bucket = fnv1a(&word.to_lowercase()) as usize % DIMENSIONS;
            vector[bucket] += 1.0;
        }
        vector
    }
}

fn fnv1a(word: &str) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in word.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[async_trait]
impl EmbeddingProvider for HashEmbeddingProvider {
    async fn generate_embedding(
        &self,
        request: EmbeddingRequest,
    ) -> Result<EmbeddingResponse, EmbeddingProviderError> {
        Ok(EmbeddingResponse {
            embedding: Self::embed(&request.text),
            model_name: "hash".to_string(),
            token_count: None,
        })
    }

    async fn generate_embeddings(
        &self,
        request: BatchEmbeddingRequest,
    ) -> Result<BatchEmbeddingResponse, EmbeddingProviderError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(BatchEmbeddingResponse {
            embeddings: request.texts.iter().map(|t| Self::embed(t)).collect(),
            model_name: "hash".to_string(),
            total_tokens: None,
        })
    }

    fn model_name(&self) -> &str {
        "hash"
    }
}

/// Fails every batch call after `succeed_batches` successful ones.
pub struct FlakyEmbeddingProvider {
    inner: HashEmbeddingProvider,
    succeed_batches: usize,
    calls: AtomicUsize,
}

impl FlakyEmbeddingProvider {
    pub fn new(succeed_batches: usize) -> Self {
        Self {
            inner: HashEmbeddingProvider::new(),
            succeed_batches,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for FlakyEmbeddingProvider {
    async fn generate_embedding(
        &self,
        request: EmbeddingRequest,
    ) -> Result<EmbeddingResponse, EmbeddingProviderError> {
        self.inner.generate_embedding(request).await
    }

    async fn generate_embeddings(
        &self,
        request: BatchEmbeddingRequest,
    ) -> Result<BatchEmbeddingResponse, EmbeddingProviderError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) >= self.succeed_batches {
            return Err(EmbeddingProviderError::ServiceUnavailable);
        }
        self.inner.generate_embeddings(request).await
    }

    fn model_name(&self) -> &str {
        "flaky"
    }
}

/// Returns a fixed answer and remembers every prompt it was given.
pub struct ScriptedLanguageModel {
    answer: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLanguageModel {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedLanguageModel {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LanguageModelError> {
        self.prompts.lock().unwrap().push(request.prompt);
        Ok(self.answer.clone())
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

pub struct FailingLanguageModel;

#[async_trait]
impl LanguageModel for FailingLanguageModel {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, LanguageModelError> {
        Err(LanguageModelError::NetworkError("connection refused".to_string()))
    }

    fn model_name(&self) -> &str {
        "failing"
    }
}

/// Writes a PDF with one page per entry; an empty entry produces a page without text.
pub fn write_pdf(path: &Path, pages: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let operations = if text.is_empty() {
            Vec::new()
        } else {
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 10.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ]
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// `"revenue "` repeated to exactly `total_chars` characters.
pub fn filler_text(total_chars: usize) -> String {
    "revenue ".repeat(total_chars / 8 + 1)[..total_chars].to_string()
}

/// PDF bytes as they would arrive in an upload.
pub fn pdf_bytes(pages: &[&str]) -> Vec<u8> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fixture.pdf");
    write_pdf(&path, pages);
    std::fs::read(path).unwrap()
}

/// Real storage, index and extractor rooted in one temporary directory.
pub struct TestWorkspace {
    pub dir: TempDir,
    pub storage: Arc<LocalFileStorage>,
    pub index: Arc<LocalVectorStore>,
    pub processor: Arc<DocumentProcessorService>,
}

impl TestWorkspace {
    pub async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(LocalFileStorage::new(dir.path().join("uploads")));
        let index = Arc::new(
            LocalVectorStore::open(
                dir.path().join("vector_store"),
                Arc::new(HashEmbeddingProvider::new()),
            )
            .await
            .unwrap(),
        );
        let processor = Arc::new(DocumentProcessorService::new(
            Arc::new(PdfTextExtractor::new()),
            Chunker::with_sizes(1000, 200).unwrap(),
            index.clone(),
        ));

        Self {
            dir,
            storage,
            index,
            processor,
        }
    }
}
