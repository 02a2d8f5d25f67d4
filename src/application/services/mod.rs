pub mod answer_generator;
pub mod chunker;
pub mod context_builder;
pub mod document_processor;
pub mod rag_pipeline;
pub mod retriever;

pub use answer_generator::AnswerGenerator;
pub use chunker::{Chunker, OverlappingTextSplitter, TextSplitter};
pub use context_builder::ContextBuilder;
pub use document_processor::{DocumentProcessingError, DocumentProcessorService, IngestionReport};
pub use rag_pipeline::{PipelineAnswer, RagPipeline, RetrievalSettings, SourceAttribution};
pub use retriever::Retriever;
