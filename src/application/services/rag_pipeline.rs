use std::time::Instant;

use crate::application::ports::vector_index::IndexError;
use crate::application::services::{AnswerGenerator, ContextBuilder, Retriever};
use crate::domain::entities::{ChunkMetadata, ConversationTurn, ScoredChunk};
use crate::domain::value_objects::DocumentId;

#[derive(Debug, Clone, Copy)]
pub struct RetrievalSettings {
    pub k: usize,
    pub similarity_threshold: f32,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            k: 2,
            similarity_threshold: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceAttribution {
    pub content: String,
    pub page: u32,
    pub score: f32,
    pub metadata: ChunkMetadata,
}

impl From<ScoredChunk> for SourceAttribution {
    fn from(result: ScoredChunk) -> Self {
        let metadata = result.chunk.metadata().clone();
        Self {
            content: result.chunk.content().to_string(),
            page: metadata.page_number,
            score: result.score,
            metadata,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineAnswer {
    pub answer: String,
    pub sources: Vec<SourceAttribution>,
    /// Wall-clock seconds for the whole pipeline.
    pub processing_time: f64,
}

/// Retrieve, build context, generate, package. Holds no per-request state and never
/// writes to the index.
pub struct RagPipeline {
    retriever: Retriever,
    context_builder: ContextBuilder,
    answer_generator: AnswerGenerator,
    settings: RetrievalSettings,
}

impl RagPipeline {
    pub fn new(
        retriever: Retriever,
        context_builder: ContextBuilder,
        answer_generator: AnswerGenerator,
        settings: RetrievalSettings,
    ) -> Self {
        Self {
            retriever,
            context_builder,
            answer_generator,
            settings,
        }
    }

    pub async fn answer_question(
        &self,
        question: &str,
        chat_history: &[ConversationTurn],
        document_id: Option<&DocumentId>,
    ) -> Result<PipelineAnswer, IndexError> {
        let start_time = Instant::now();

        let retrieved = self
            .retriever
            .retrieve(
                question,
                self.settings.k,
                document_id,
                self.settings.similarity_threshold,
            )
            .await?;

        let context = self.context_builder.build(&retrieved);
        let answer = self
            .answer_generator
            .answer(question, &context, chat_history)
            .await;

        let sources: Vec<SourceAttribution> =
            retrieved.into_iter().map(SourceAttribution::from).collect();
        let processing_time = start_time.elapsed().as_secs_f64();

        tracing::info!(
            "Answered question with {} sources in {:.3}s",
            sources.len(),
            processing_time
        );

        Ok(PipelineAnswer {
            answer,
            sources,
            processing_time,
        })
    }
}
