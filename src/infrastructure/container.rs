use std::sync::Arc;

use crate::{
    application::{
        ports::{EmbeddingProvider, FileStorage, LanguageModel, TextExtractor, VectorIndex},
        services::{
            AnswerGenerator, Chunker, ContextBuilder, DocumentProcessorService, RagPipeline,
            RetrievalSettings, Retriever,
        },
        use_cases::{
            AskQuestionUseCase, DeleteDocumentUseCase, GetDocumentFileUseCase, ListChunksUseCase,
            ListDocumentsUseCase, UploadDocumentUseCase,
        },
    },
    config::Settings,
    infrastructure::{
        external_services::{
            ChatCompletionClient, ChatCompletionConfig, EmbeddingsClientConfig,
            InferenceEmbeddingProvider, PdfTextExtractor,
        },
        file_system::LocalFileStorage,
        vector_store::LocalVectorStore,
    },
    presentation::http::handlers::{ChatHandler, ChunkHandler, DocumentHandler, HealthHandler},
};

pub struct AppContainer {
    // External Services
    pub embedding_provider: Arc<dyn EmbeddingProvider>,
    pub language_model: Arc<dyn LanguageModel>,
    pub file_storage: Arc<dyn FileStorage>,
    pub text_extractor: Arc<dyn TextExtractor>,
    pub vector_index: Arc<dyn VectorIndex>,

    // Application Services
    pub document_processor: Arc<DocumentProcessorService>,
    pub rag_pipeline: Arc<RagPipeline>,

    // Use Cases
    pub upload_document_use_case: Arc<UploadDocumentUseCase>,
    pub ask_question_use_case: Arc<AskQuestionUseCase>,
    pub list_documents_use_case: Arc<ListDocumentsUseCase>,
    pub delete_document_use_case: Arc<DeleteDocumentUseCase>,
    pub get_document_file_use_case: Arc<GetDocumentFileUseCase>,
    pub list_chunks_use_case: Arc<ListChunksUseCase>,

    // HTTP Handlers
    pub document_handler: Arc<DocumentHandler>,
    pub chat_handler: Arc<ChatHandler>,
    pub chunk_handler: Arc<ChunkHandler>,
    pub health_handler: Arc<HealthHandler>,
}

impl AppContainer {
    pub async fn new(settings: &Settings) -> Result<Self, Box<dyn std::error::Error>> {
        let embedding_provider: Arc<dyn EmbeddingProvider> = Arc::new(
            InferenceEmbeddingProvider::from_config(EmbeddingsClientConfig {
                service_url: settings.embedding_service_url.clone(),
                model: settings.embedding_model.clone(),
                api_key: settings.embedding_api_key.clone(),
                max_retries: settings.embedding_max_retries,
                timeout_secs: settings.embedding_timeout_secs,
                ..EmbeddingsClientConfig::default()
            })
            .map_err(|e| format!("Failed to create embedding client: {}", e))?,
        );

        let language_model: Arc<dyn LanguageModel> = Arc::new(
            ChatCompletionClient::new(ChatCompletionConfig {
                service_url: settings.llm_service_url.clone(),
                model: settings.llm_model.clone(),
                api_key: settings.llm_api_key.clone(),
                temperature: settings.llm_temperature,
                timeout_secs: settings.llm_timeout_secs,
            })
            .map_err(|e| format!("Failed to create language model client: {}", e))?,
        );

        if settings.embedding_api_key.is_none() {
            tracing::warn!("No embedding API key configured; requests are sent unauthenticated");
        }

        Self::with_providers(settings, embedding_provider, language_model).await
    }

    /// Wires everything around the two remote services, which callers may substitute.
    pub async fn with_providers(
        settings: &Settings,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        language_model: Arc<dyn LanguageModel>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let file_storage: Arc<dyn FileStorage> =
            Arc::new(LocalFileStorage::new(settings.upload_dir.clone()));
        let text_extractor: Arc<dyn TextExtractor> = Arc::new(PdfTextExtractor::new());

        let vector_index: Arc<dyn VectorIndex> = Arc::new(
            LocalVectorStore::open(settings.vector_store_dir.clone(), embedding_provider.clone())
                .await
                .map_err(|e| format!("Failed to open vector store: {}", e))?,
        );

        // Create application services
        let chunker = Chunker::with_sizes(settings.chunk_size, settings.chunk_overlap)?;
        let document_processor = Arc::new(DocumentProcessorService::new(
            text_extractor.clone(),
            chunker,
            vector_index.clone(),
        ));

        let rag_pipeline = Arc::new(RagPipeline::new(
            Retriever::new(vector_index.clone()),
            ContextBuilder::from_token_budget(settings.max_context_tokens),
            AnswerGenerator::new(language_model.clone(), settings.max_tokens),
            RetrievalSettings {
                k: settings.retrieval_k,
                similarity_threshold: settings.similarity_threshold,
            },
        ));

        // Create use cases
        let upload_document_use_case = Arc::new(UploadDocumentUseCase::new(
            file_storage.clone(),
            document_processor.clone(),
            settings.max_upload_bytes,
        ));
        let ask_question_use_case = Arc::new(AskQuestionUseCase::new(rag_pipeline.clone()));
        let list_documents_use_case = Arc::new(ListDocumentsUseCase::new(vector_index.clone()));
        let delete_document_use_case = Arc::new(DeleteDocumentUseCase::new(
            vector_index.clone(),
            file_storage.clone(),
        ));
        let get_document_file_use_case = Arc::new(GetDocumentFileUseCase::new(
            vector_index.clone(),
            file_storage.clone(),
        ));
        let list_chunks_use_case = Arc::new(ListChunksUseCase::new(vector_index.clone()));

        // Create HTTP handlers
        let document_handler = Arc::new(DocumentHandler::new(
            upload_document_use_case.clone(),
            list_documents_use_case.clone(),
            delete_document_use_case.clone(),
            get_document_file_use_case.clone(),
        ));
        let chat_handler = Arc::new(ChatHandler::new(ask_question_use_case.clone()));
        let chunk_handler = Arc::new(ChunkHandler::new(list_chunks_use_case.clone()));
        let health_handler = Arc::new(HealthHandler::new(vector_index.clone()));

        Ok(Self {
            embedding_provider,
            language_model,
            file_storage,
            text_extractor,
            vector_index,
            document_processor,
            rag_pipeline,
            upload_document_use_case,
            ask_question_use_case,
            list_documents_use_case,
            delete_document_use_case,
            get_document_file_use_case,
            list_chunks_use_case,
            document_handler,
            chat_handler,
            chunk_handler,
            health_handler,
        })
    }
}
