use std::sync::Arc;

use crate::application::AppError;
use crate::application::ports::VectorIndex;
use crate::domain::entities::DocumentSummary;

pub struct ListDocumentsUseCase {
    vector_index: Arc<dyn VectorIndex>,
}

impl ListDocumentsUseCase {
    pub fn new(vector_index: Arc<dyn VectorIndex>) -> Self {
        Self { vector_index }
    }

    pub async fn execute(&self) -> Result<Vec<DocumentSummary>, AppError> {
        let records = self.vector_index.records(None).await?;
        Ok(DocumentSummary::group(records.iter().map(|r| &r.chunk)))
    }
}
