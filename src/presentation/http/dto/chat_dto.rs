use serde::{Deserialize, Serialize};

use crate::application::services::{PipelineAnswer, SourceAttribution};
use crate::domain::entities::{ChunkMetadata, ConversationTurn};

#[derive(Debug, Deserialize)]
pub struct ChatRequestDto {
    pub question: String,
    #[serde(default)]
    pub chat_history: Vec<ConversationTurn>,
    #[serde(default)]
    pub document_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SourceDto {
    pub content: String,
    pub page: u32,
    pub score: f32,
    pub metadata: ChunkMetadata,
}

impl From<SourceAttribution> for SourceDto {
    fn from(source: SourceAttribution) -> Self {
        Self {
            content: source.content,
            page: source.page,
            score: source.score,
            metadata: source.metadata,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatResponseDto {
    pub answer: String,
    pub sources: Vec<SourceDto>,
    pub processing_time: f64,
}

impl From<PipelineAnswer> for ChatResponseDto {
    fn from(answer: PipelineAnswer) -> Self {
        Self {
            answer: answer.answer,
            sources: answer.sources.into_iter().map(SourceDto::from).collect(),
            processing_time: answer.processing_time,
        }
    }
}
