use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::language_model::{
    CompletionRequest, LanguageModel, LanguageModelError,
};

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionResponse {
    fn first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
    }
}

#[derive(Debug, Clone)]
pub struct ChatCompletionConfig {
    pub service_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for ChatCompletionConfig {
    fn default() -> Self {
        Self {
            service_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            temperature: 0.1,
            timeout_secs: 60,
        }
    }
}

/// [`LanguageModel`] over an OpenAI-compatible `/chat/completions` endpoint. The prompt is
/// sent as a single user message.
pub struct ChatCompletionClient {
    client: Client,
    config: ChatCompletionConfig,
}

impl ChatCompletionClient {
    pub fn new(config: ChatCompletionConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.service_url.trim_end_matches('/')
        )
    }

    fn request_body<'a>(&'a self, request: &'a CompletionRequest) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: self.config.temperature,
        }
    }
}

#[async_trait]
impl LanguageModel for ChatCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LanguageModelError> {
        let mut builder = self
            .client
            .post(self.endpoint())
            .json(&self.request_body(&request));
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| LanguageModelError::NetworkError(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LanguageModelError::ApiError(format!("{}: {}", status, body)));
        }

        let parsed = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| LanguageModelError::ApiError(e.to_string()))?;

        parsed
            .first_content()
            .ok_or(LanguageModelError::EmptyCompletion)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
