use std::sync::Arc;

use crate::application::ports::LanguageModel;
use crate::application::ports::language_model::{CompletionRequest, LanguageModelError};
use crate::domain::entities::ConversationTurn;

pub const SYSTEM_INSTRUCTION: &str = "You are a financial analysis assistant. Answer questions \
about financial statements and reports using only the provided context. Quote figures exactly \
as they appear. If the context does not contain the answer, say that you could not find it in \
the uploaded documents.";

pub const FALLBACK_ANSWER: &str =
    "I'm sorry, I could not generate an answer at this time. Please try again later.";

/// Builds the grounded prompt and calls the language model. Model failures are logged and
/// replaced by [`FALLBACK_ANSWER`]; they never reach the caller.
pub struct AnswerGenerator {
    language_model: Arc<dyn LanguageModel>,
    max_tokens: u32,
}

impl AnswerGenerator {
    pub fn new(language_model: Arc<dyn LanguageModel>, max_tokens: u32) -> Self {
        Self {
            language_model,
            max_tokens,
        }
    }

    pub fn build_prompt(
        question: &str,
        context: &str,
        chat_history: &[ConversationTurn],
    ) -> String {
        let mut prompt = String::from(SYSTEM_INSTRUCTION);
        prompt.push_str("\n\n");

        if !context.is_empty() {
            prompt.push_str("Context:\n");
            prompt.push_str(context);
            prompt.push_str("\n\n");
        }

        for turn in chat_history {
            prompt.push_str(&format!("User: {}\n", turn.question));
            prompt.push_str(&format!("Assistant: {}\n", turn.answer));
        }

        prompt.push_str(&format!("User: {}\n", question));
        prompt.push_str("Assistant:");
        prompt
    }

    pub async fn answer(
        &self,
        question: &str,
        context: &str,
        chat_history: &[ConversationTurn],
    ) -> String {
        let request = CompletionRequest {
            prompt: Self::build_prompt(question, context, chat_history),
            max_tokens: self.max_tokens,
        };

        match self.generate(request).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!(
                    "Language model {} failed, returning fallback answer: {}",
                    self.language_model.model_name(),
                    e
                );
                FALLBACK_ANSWER.to_string()
            }
        }
    }

    async fn generate(&self, request: CompletionRequest) -> Result<String, LanguageModelError> {
        let completion = self.language_model.complete(request).await?;
        let trimmed = completion.trim();
        if trimmed.is_empty() {
            return Err(LanguageModelError::EmptyCompletion);
        }
        Ok(trimmed.to_string())
    }
}
