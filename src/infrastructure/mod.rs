pub mod container;
pub mod external_services;
pub mod file_system;
pub mod vector_store;

// Re-export commonly used items
pub use container::AppContainer;
pub use external_services::{ChatCompletionClient, InferenceEmbeddingProvider, PdfTextExtractor};
pub use file_system::LocalFileStorage;
pub use vector_store::LocalVectorStore;
