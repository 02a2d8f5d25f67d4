use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const MIB: usize = 1024 * 1024;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}")]
    InvalidValue { name: &'static str, value: String },
    #[error("{0}")]
    Inconsistent(String),
}

/// Runtime settings read from the environment (after `.env` is loaded).
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub vector_store_dir: PathBuf,
    pub max_upload_bytes: usize,

    pub embedding_service_url: String,
    pub embedding_model: String,
    pub embedding_api_key: Option<String>,
    pub embedding_timeout_secs: u64,
    pub embedding_max_retries: u32,

    pub llm_service_url: String,
    pub llm_model: String,
    pub llm_api_key: Option<String>,
    pub llm_temperature: f32,
    pub max_tokens: u32,
    pub llm_timeout_secs: u64,

    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub retrieval_k: usize,
    pub similarity_threshold: f32,
    pub max_context_tokens: usize,

    pub allowed_origins: Vec<String>,
    pub log_level: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let openai_key = get("OPENAI_API_KEY");

        let settings = Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse(&get, "PORT", 8000)?,
            upload_dir: PathBuf::from(get("UPLOAD_DIR").unwrap_or_else(|| "./uploads".to_string())),
            vector_store_dir: PathBuf::from(
                get("VECTOR_STORE_DIR").unwrap_or_else(|| "./vector_store".to_string()),
            ),
            max_upload_bytes: parse(&get, "MAX_UPLOAD_BYTES", 50 * MIB)?,

            embedding_service_url: get("EMBEDDING_SERVICE_URL")
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            embedding_model: get("EMBEDDING_MODEL")
                .unwrap_or_else(|| "text-embedding-ada-002".to_string()),
            embedding_api_key: get("EMBEDDING_API_KEY").or_else(|| openai_key.clone()),
            embedding_timeout_secs: parse(&get, "EMBEDDING_TIMEOUT_SECS", 30)?,
            embedding_max_retries: parse(&get, "EMBEDDING_MAX_RETRIES", 0)?,

            llm_service_url: get("LLM_SERVICE_URL")
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            llm_model: get("LLM_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
            llm_api_key: get("LLM_API_KEY").or(openai_key),
            llm_temperature: parse(&get, "LLM_TEMPERATURE", 0.1)?,
            max_tokens: parse(&get, "MAX_TOKENS", 1000)?,
            llm_timeout_secs: parse(&get, "LLM_TIMEOUT_SECS", 60)?,

            chunk_size: parse(&get, "CHUNK_SIZE", 1000)?,
            chunk_overlap: parse(&get, "CHUNK_OVERLAP", 200)?,
            retrieval_k: parse(&get, "RETRIEVAL_K", 2)?,
            similarity_threshold: parse(&get, "SIMILARITY_THRESHOLD", 0.7)?,
            max_context_tokens: parse(&get, "MAX_CONTEXT_TOKENS", 3000)?,

            allowed_origins: get("ALLOWED_ORIGINS")
                .unwrap_or_else(|| "http://localhost:3000,http://127.0.0.1:3000".to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        };

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("CHUNK_SIZE", self.chunk_size),
            ("CHUNK_OVERLAP", self.chunk_overlap),
            ("RETRIEVAL_K", self.retrieval_k),
            ("MAX_CONTEXT_TOKENS", self.max_context_tokens),
            ("MAX_UPLOAD_BYTES", self.max_upload_bytes),
            ("MAX_TOKENS", self.max_tokens as usize),
        ];
        if let Some((name, value)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::InvalidValue {
                name: *name,
                value: value.to_string(),
            });
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(ConfigError::Inconsistent(format!(
                "CHUNK_OVERLAP ({}) must be smaller than CHUNK_SIZE ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        if !(-1.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::InvalidValue {
                name: "SIMILARITY_THRESHOLD",
                value: self.similarity_threshold.to_string(),
            });
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// `*` anywhere in `ALLOWED_ORIGINS` opens CORS to every origin.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

fn parse<T, G>(get: &G, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            name,
            value: raw,
        }),
        None => Ok(default),
    }
}
