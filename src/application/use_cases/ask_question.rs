use std::sync::Arc;

use crate::application::AppError;
use crate::application::services::{PipelineAnswer, RagPipeline};
use crate::domain::entities::ConversationTurn;
use crate::domain::value_objects::DocumentId;

#[derive(Debug, Clone)]
pub struct AskQuestionRequest {
    pub question: String,
    pub chat_history: Vec<ConversationTurn>,
    pub document_id: Option<DocumentId>,
}

pub struct AskQuestionUseCase {
    pipeline: Arc<RagPipeline>,
}

impl AskQuestionUseCase {
    pub fn new(pipeline: Arc<RagPipeline>) -> Self {
        Self { pipeline }
    }

    pub async fn execute(&self, request: AskQuestionRequest) -> Result<PipelineAnswer, AppError> {
        let question = request.question.trim();
        if question.is_empty() {
            return Err(AppError::validation("Question cannot be empty"));
        }

        // A blank id means "all documents", same as an absent one.
        let document_id = request.document_id.filter(|id| !id.is_blank());

        let answer = self
            .pipeline
            .answer_question(question, &request.chat_history, document_id.as_ref())
            .await?;
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::VectorIndex;
    use crate::application::services::{
        AnswerGenerator, ContextBuilder, RetrievalSettings, Retriever,
    };
    use crate::application::use_cases::{UploadDocumentRequest, UploadDocumentUseCase};
    use crate::test_support::{ScriptedLanguageModel, TestWorkspace, pdf_bytes};

    fn use_case(workspace: &TestWorkspace, model: Arc<ScriptedLanguageModel>) -> AskQuestionUseCase {
        let pipeline = RagPipeline::new(
            Retriever::new(workspace.index.clone()),
            ContextBuilder::default(),
            AnswerGenerator::new(model, 256),
            RetrievalSettings {
                k: 4,
                similarity_threshold: 0.1,
            },
        );
        AskQuestionUseCase::new(Arc::new(pipeline))
    }

    async fn upload(workspace: &TestWorkspace, name: &str, pages: &[&str]) -> DocumentId {
        UploadDocumentUseCase::new(workspace.storage.clone(), workspace.processor.clone(), 1 << 20)
            .execute(UploadDocumentRequest {
                file_name: name.to_string(),
                file_data: pdf_bytes(pages),
                content_type: None,
            })
            .await
            .unwrap()
            .document_id
    }

    #[tokio::test]
    async fn test_blank_question_is_rejected() {
        let workspace = TestWorkspace::new().await;
        let model = Arc::new(ScriptedLanguageModel::new("unused"));
        let use_case = use_case(&workspace, model.clone());

        let result = use_case
            .execute(AskQuestionRequest {
                question: "   ".to_string(),
                chat_history: Vec::new(),
                document_id: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(model.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_document_filter_isolates_sources() {
        let workspace = TestWorkspace::new().await;
        let first = upload(&workspace, "first.pdf", &["Revenue increased in the quarter"]).await;
        let second = upload(&workspace, "second.pdf", &["Revenue decreased sharply"]).await;
        let model = Arc::new(ScriptedLanguageModel::new("Revenue decreased."));
        let use_case = use_case(&workspace, model);

        let answer = use_case
            .execute(AskQuestionRequest {
                question: "What happened to revenue?".to_string(),
                chat_history: Vec::new(),
                document_id: Some(second.clone()),
            })
            .await
            .unwrap();

        assert!(!answer.sources.is_empty());
        assert!(answer.sources.iter().all(|s| s.metadata.document_id == second));
        assert!(answer.sources.iter().all(|s| s.metadata.document_id != first));
    }

    #[tokio::test]
    async fn test_unknown_document_answers_without_sources() {
        let workspace = TestWorkspace::new().await;
        upload(&workspace, "report.pdf", &["Revenue increased"]).await;
        let model = Arc::new(ScriptedLanguageModel::new("No information found."));
        let use_case = use_case(&workspace, model);

        let answer = use_case
            .execute(AskQuestionRequest {
                question: "Revenue?".to_string(),
                chat_history: Vec::new(),
                document_id: Some(DocumentId::from("missing")),
            })
            .await
            .unwrap();

        assert!(answer.sources.is_empty());
        assert_eq!(answer.answer, "No information found.");
        assert_eq!(workspace.index.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_history_reaches_the_prompt() {
        let workspace = TestWorkspace::new().await;
        let model = Arc::new(ScriptedLanguageModel::new("ok"));
        let use_case = use_case(&workspace, model.clone());

        use_case
            .execute(AskQuestionRequest {
                question: "And last year?".to_string(),
                chat_history: vec![ConversationTurn::new("Revenue this year?", "$5M.")],
                document_id: Some(DocumentId::from("")),
            })
            .await
            .unwrap();

        let prompt = &model.prompts()[0];
        assert!(prompt.contains("User: Revenue this year?\nAssistant: $5M.\n"));
        assert!(prompt.ends_with("User: And last year?\nAssistant:"));
    }
}
