use serde::Serialize;

/// Error envelope shared by every endpoint: `{"error": {"code", "message"}}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiError {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponseDto {
    pub status: String,
    pub version: String,
    pub indexed_chunks: usize,
}

#[derive(Debug, Serialize)]
pub struct MessageResponseDto {
    pub message: String,
}
