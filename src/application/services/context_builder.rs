use crate::domain::entities::ScoredChunk;

pub const DEFAULT_CHARS_PER_TOKEN: usize = 4;
const SEPARATOR: &str = "\n\n";

/// Joins retrieved chunk text into one context string under a character budget.
/// Chunks are never cut: the first chunk that would overflow ends the context.
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    max_context_chars: usize,
}

impl ContextBuilder {
    pub const fn new(max_context_chars: usize) -> Self {
        Self { max_context_chars }
    }

    /// Budget derived from a token limit using a fixed characters-per-token heuristic.
    pub const fn from_token_budget(max_tokens: usize) -> Self {
        Self::new(max_tokens.saturating_mul(DEFAULT_CHARS_PER_TOKEN))
    }

    pub fn max_context_chars(&self) -> usize {
        self.max_context_chars
    }

    pub fn build(&self, retrieved: &[ScoredChunk]) -> String {
        let mut context = String::new();
        let mut total_length = 0;

        for result in retrieved {
            let content = result.chunk.content();
            let separator_length = if context.is_empty() { 0 } else { SEPARATOR.len() };
            let entry_length = separator_length + content.chars().count();

            if total_length + entry_length > self.max_context_chars {
                break;
            }

            if separator_length > 0 {
                context.push_str(SEPARATOR);
            }
            context.push_str(content);
            total_length += entry_length;
        }

        context
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::from_token_budget(3000)
    }
}
