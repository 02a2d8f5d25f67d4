pub mod chunk;
pub mod conversation;
pub mod document;

pub use chunk::{Chunk, ChunkMetadata, ScoredChunk, StoredChunk};
pub use conversation::ConversationTurn;
pub use document::DocumentSummary;
