use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::infrastructure::AppContainer;
use crate::presentation::http::{
    handlers::{ChatHandler, ChunkHandler, DocumentHandler, HealthHandler},
    routes::{chat_routes, chunk_routes, document_routes, health_routes},
};

const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Upload cap plus room for the multipart framing around the file.
    pub fn body_limit(&self) -> usize {
        self.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES)
    }
}

impl From<&Settings> for ServerConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            bind_address: settings.bind_address(),
            allowed_origins: settings.allowed_origins.clone(),
            max_upload_bytes: settings.max_upload_bytes,
        }
    }
}

pub struct HttpServer {
    document_handler: Arc<DocumentHandler>,
    chat_handler: Arc<ChatHandler>,
    chunk_handler: Arc<ChunkHandler>,
    health_handler: Arc<HealthHandler>,
    config: ServerConfig,
}

impl HttpServer {
    pub fn new(
        document_handler: Arc<DocumentHandler>,
        chat_handler: Arc<ChatHandler>,
        chunk_handler: Arc<ChunkHandler>,
        health_handler: Arc<HealthHandler>,
        config: ServerConfig,
    ) -> Self {
        Self {
            document_handler,
            chat_handler,
            chunk_handler,
            health_handler,
            config,
        }
    }

    pub fn from_container(container: &AppContainer, config: ServerConfig) -> Self {
        Self::new(
            container.document_handler.clone(),
            container.chat_handler.clone(),
            container.chunk_handler.clone(),
            container.health_handler.clone(),
            config,
        )
    }

    fn cors_layer(&self) -> CorsLayer {
        let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

        if self.config.allowed_origins.iter().any(|origin| origin == "*") {
            return cors.allow_origin(Any);
        }

        let origins: Vec<HeaderValue> = self
            .config
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                    None
                }
            })
            .collect();

        cors.allow_origin(AllowOrigin::list(origins))
    }

    pub fn router(&self) -> Router {
        Router::new()
            .merge(health_routes(self.health_handler.clone()))
            .merge(document_routes(self.document_handler.clone()))
            .merge(chat_routes(self.chat_handler.clone()))
            .merge(chunk_routes(self.chunk_handler.clone()))
            .layer(self.cors_layer())
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(self.config.body_limit()))
            .layer(
                TraceLayer::new_for_http()
                    .on_request(
                        |request: &axum::http::Request<axum::body::Body>, _span: &tracing::Span| {
                            tracing::info!(
                                "Received request: {} {}",
                                request.method(),
                                request.uri()
                            );
                        },
                    )
                    .on_response(
                        |response: &axum::http::Response<axum::body::Body>,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::info!(
                                "Response: {} (took {} ms)",
                                response.status(),
                                latency.as_millis()
                            );
                        },
                    )
                    .on_failure(
                        |error: ServerErrorsFailureClass,
                         latency: std::time::Duration,
                         _span: &tracing::Span| {
                            tracing::error!(
                                "Request failed: {:?} (took {} ms)",
                                error,
                                latency.as_millis()
                            );
                        },
                    ),
            )
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        let listener = TcpListener::bind(&self.config.bind_address).await?;
        tracing::info!("Listening on {}", self.config.bind_address);
        axum::serve(listener, app).await?;

        Ok(())
    }
}
