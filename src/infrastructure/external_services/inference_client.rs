use async_trait::async_trait;
use reqwest::{Client, Error as ReqwestError, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::embedding_provider::{
    BatchEmbeddingRequest, BatchEmbeddingResponse, EmbeddingProvider, EmbeddingProviderError,
    EmbeddingRequest, EmbeddingResponse,
};

/// OpenAI-compatible `/embeddings` request body.
#[derive(Debug, Serialize)]
pub struct EmbeddingsRequest<'a> {
    pub model: &'a str,
    pub input: &'a [String],
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingData {
    pub index: usize,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingsUsage {
    #[serde(default)]
    pub total_tokens: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingsResponse {
    pub data: Vec<EmbeddingData>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub usage: Option<EmbeddingsUsage>,
}

impl EmbeddingsResponse {
    /// Vectors in input order. The API may return `data` in any order, so it is sorted by
    /// `index` and checked for gaps.
    pub fn into_ordered_embeddings(
        mut self,
        expected: usize,
    ) -> Result<Vec<Vec<f32>>, EmbeddingsError> {
        self.data.sort_by_key(|item| item.index);

        let in_order = self
            .data
            .iter()
            .enumerate()
            .all(|(position, item)| item.index == position);
        if self.data.len() != expected || !in_order {
            return Err(EmbeddingsError::ParseError(format!(
                "expected {} embeddings with contiguous indices, got {}",
                expected,
                self.data.len()
            )));
        }

        Ok(self.data.into_iter().map(|item| item.embedding).collect())
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddingsClientConfig {
    pub service_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_retries: u32,
    pub timeout_secs: u64,
    pub backoff_factor: f64,
}

impl Default for EmbeddingsClientConfig {
    fn default() -> Self {
        Self {
            service_url: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-ada-002".to_string(),
            api_key: None,
            max_retries: 0,
            timeout_secs: 30,
            backoff_factor: 1.5,
        }
    }
}

impl EmbeddingsClientConfig {
    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.service_url.trim_end_matches('/'))
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        Duration::from_millis((self.backoff_factor.powi(exponent) * 1000.0) as u64)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EmbeddingsError {
    #[error("request failed: {0}")]
    RequestError(String),
    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid response: {0}")]
    ParseError(String),
}

impl EmbeddingsError {
    fn is_retryable(&self) -> bool {
        match self {
            EmbeddingsError::RequestError(_) => true,
            EmbeddingsError::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            EmbeddingsError::ParseError(_) => false,
        }
    }
}

impl From<EmbeddingsError> for EmbeddingProviderError {
    fn from(error: EmbeddingsError) -> Self {
        match error {
            EmbeddingsError::RequestError(msg) => EmbeddingProviderError::NetworkError(msg),
            EmbeddingsError::Status { status, .. } if status == StatusCode::TOO_MANY_REQUESTS => {
                EmbeddingProviderError::RateLimitExceeded
            }
            EmbeddingsError::Status { status, .. } if status.is_server_error() => {
                EmbeddingProviderError::ServiceUnavailable
            }
            EmbeddingsError::Status { status, body } => {
                EmbeddingProviderError::ApiError(format!("{}: {}", status, body))
            }
            EmbeddingsError::ParseError(msg) => EmbeddingProviderError::ApiError(msg),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: Client,
    config: EmbeddingsClientConfig,
}

impl InferenceClient {
    pub fn new(config: EmbeddingsClientConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub async fn get_embeddings(
        &self,
        texts: &[String],
    ) -> Result<EmbeddingsResponse, EmbeddingsError> {
        let request = EmbeddingsRequest {
            model: &self.config.model,
            input: texts,
        };

        self.send_request(&request).await
    }

    async fn send_request(
        &self,
        request: &EmbeddingsRequest<'_>,
    ) -> Result<EmbeddingsResponse, EmbeddingsError> {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.execute_request(request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempts <= self.config.max_retries => {
                    let backoff_time = self.config.backoff(attempts);
                    tracing::warn!(
                        "Embedding request failed (attempt {}), retrying in {:?}: {}",
                        attempts,
                        backoff_time,
                        e
                    );
                    tokio::time::sleep(backoff_time).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn execute_request(
        &self,
        request: &EmbeddingsRequest<'_>,
    ) -> Result<EmbeddingsResponse, EmbeddingsError> {
        let mut builder = self.client.post(self.config.endpoint()).json(request);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| EmbeddingsError::RequestError(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingsError::Status { status, body });
        }

        response
            .json::<EmbeddingsResponse>()
            .await
            .map_err(|e| EmbeddingsError::ParseError(e.to_string()))
    }
}

/// [`EmbeddingProvider`] backed by an OpenAI-compatible embeddings endpoint.
pub struct InferenceEmbeddingProvider {
    client: InferenceClient,
}

impl InferenceEmbeddingProvider {
    pub fn new(client: InferenceClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: EmbeddingsClientConfig) -> Result<Self, ReqwestError> {
        Ok(Self::new(InferenceClient::new(config)?))
    }
}

#[async_trait]
impl EmbeddingProvider for InferenceEmbeddingProvider {
    async fn generate_embedding(
        &self,
        request: EmbeddingRequest,
    ) -> Result<EmbeddingResponse, EmbeddingProviderError> {
        let batch = self
            .generate_embeddings(BatchEmbeddingRequest {
                texts: vec![request.text],
            })
            .await?;

        let embedding = batch.embeddings.into_iter().next().ok_or_else(|| {
            EmbeddingProviderError::ApiError("No embeddings returned".to_string())
        })?;

        Ok(EmbeddingResponse {
            embedding,
            model_name: batch.model_name,
            token_count: batch.total_tokens,
        })
    }

    async fn generate_embeddings(
        &self,
        request: BatchEmbeddingRequest,
    ) -> Result<BatchEmbeddingResponse, EmbeddingProviderError> {
        if request.texts.is_empty() {
            return Err(EmbeddingProviderError::InvalidInput(
                "No texts to embed".to_string(),
            ));
        }

        let response = self.client.get_embeddings(&request.texts).await?;
        let model_name = response
            .model
            .clone()
            .unwrap_or_else(|| self.client.model().to_string());
        let total_tokens = response.usage.as_ref().and_then(|u| u.total_tokens);
        let embeddings = response.into_ordered_embeddings(request.texts.len())?;

        Ok(BatchEmbeddingResponse {
            embeddings,
            model_name,
            total_tokens,
        })
    }

    fn model_name(&self) -> &str {
        self.client.model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_construction() {
        let texts = vec!["Hello".to_string(), "World".to_string()];
        let request = EmbeddingsRequest {
            model: "text-embedding-ada-002",
            input: &texts,
        };

        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "text-embedding-ada-002");
        assert_eq!(json["input"][1], "World");
    }

    #[test]
    fn test_response_is_reordered_by_index() {
        let response: EmbeddingsResponse = serde_json::from_str(
            r#"{
                "object": "list",
                "data": [
                    {"object": "embedding", "index": 1, "embedding": [0.0, 1.0]},
                    {"object": "embedding", "index": 0, "embedding": [1.0, 0.0]}
                ],
                "model": "text-embedding-ada-002",
                "usage": {"prompt_tokens": 4, "total_tokens": 4}
            }"#,
        )
        .unwrap();

        let embeddings = response.into_ordered_embeddings(2).unwrap();

        assert_eq!(embeddings, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn test_response_with_missing_items_is_rejected() {
        let response: EmbeddingsResponse =
            serde_json::from_str(r#"{"data": [{"index": 0, "embedding": [1.0]}]}"#).unwrap();

        assert!(matches!(
            response.into_ordered_embeddings(2),
            Err(EmbeddingsError::ParseError(_))
        ));
    }

    #[test]
    fn test_error_mapping() {
        let rate_limited = EmbeddingsError::Status {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: String::new(),
        };
        let unauthorized = EmbeddingsError::Status {
            status: StatusCode::UNAUTHORIZED,
            body: "bad key".to_string(),
        };

        assert!(rate_limited.is_retryable());
        assert!(!unauthorized.is_retryable());
        assert!(matches!(
            EmbeddingProviderError::from(rate_limited),
            EmbeddingProviderError::RateLimitExceeded
        ));
        assert!(matches!(
            EmbeddingProviderError::from(unauthorized),
            EmbeddingProviderError::ApiError(_)
        ));
    }

    #[test]
    fn test_endpoint_and_backoff() {
        let config = EmbeddingsClientConfig {
            service_url: "http://localhost:8080/v1/".to_string(),
            ..EmbeddingsClientConfig::default()
        };

        assert_eq!(config.endpoint(), "http://localhost:8080/v1/embeddings");
        assert_eq!(config.backoff(1), Duration::from_millis(1000));
        assert_eq!(config.backoff(2), Duration::from_millis(1500));
    }
}
