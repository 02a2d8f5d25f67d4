use axum::{Json, extract::State, response::IntoResponse};
use std::sync::Arc;

use crate::application::AppError;
use crate::application::use_cases::{AskQuestionRequest, AskQuestionUseCase};
use crate::domain::value_objects::DocumentId;
use crate::presentation::http::dto::{ChatRequestDto, ChatResponseDto};

pub struct ChatHandler {
    ask_question_use_case: Arc<AskQuestionUseCase>,
}

impl ChatHandler {
    pub fn new(ask_question_use_case: Arc<AskQuestionUseCase>) -> Self {
        Self {
            ask_question_use_case,
        }
    }

    pub async fn chat(
        State(handler): State<Arc<ChatHandler>>,
        Json(request): Json<ChatRequestDto>,
    ) -> Result<impl IntoResponse, AppError> {
        let answer = handler
            .ask_question_use_case
            .execute(AskQuestionRequest {
                question: request.question,
                chat_history: request.chat_history,
                document_id: request.document_id.map(DocumentId::from),
            })
            .await?;

        Ok(Json(ChatResponseDto::from(answer)))
    }
}
