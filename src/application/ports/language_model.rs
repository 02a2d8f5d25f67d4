use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum LanguageModelError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Empty completion")]
    EmptyCompletion,
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LanguageModelError>;

    fn model_name(&self) -> &str;
}
