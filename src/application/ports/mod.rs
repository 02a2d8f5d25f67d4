pub mod document_extractor;
pub mod embedding_provider;
pub mod file_storage;
pub mod language_model;
pub mod vector_index;

pub use document_extractor::TextExtractor;
pub use embedding_provider::EmbeddingProvider;
pub use file_storage::FileStorage;
pub use language_model::LanguageModel;
pub use vector_index::VectorIndex;
