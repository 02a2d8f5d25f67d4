pub mod chat_handler;
pub mod chunk_handler;
pub mod document_handler;
pub mod health_handler;

pub use chat_handler::ChatHandler;
pub use chunk_handler::ChunkHandler;
pub use document_handler::DocumentHandler;
pub use health_handler::HealthHandler;
