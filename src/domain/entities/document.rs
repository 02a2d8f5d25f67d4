use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Chunk;
use crate::domain::value_objects::{DocumentId, DocumentStatus};

/// A document reconstructed from the chunks that share its id. There is no separate
/// document record, so this is always derived from the index contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSummary {
    pub document_id: DocumentId,
    pub filename: String,
    pub upload_date: DateTime<Utc>,
    pub chunks_count: usize,
    pub status: DocumentStatus,
}

impl DocumentSummary {
    /// Groups chunks by document id, newest upload first.
    pub fn group<'a>(chunks: impl IntoIterator<Item = &'a Chunk>) -> Vec<DocumentSummary> {
        let mut grouped: BTreeMap<&DocumentId, DocumentSummary> = BTreeMap::new();

        for chunk in chunks {
            let meta = chunk.metadata();
            grouped
                .entry(&meta.document_id)
                .and_modify(|summary| summary.chunks_count += 1)
                .or_insert_with(|| DocumentSummary {
                    document_id: meta.document_id.clone(),
                    filename: meta.filename.clone(),
                    upload_date: parse_upload_date(meta.upload_date.as_deref()),
                    chunks_count: 1,
                    status: DocumentStatus::default(),
                });
        }

        let mut documents: Vec<DocumentSummary> = grouped.into_values().collect();
        documents.sort_by(|a, b| {
            b.upload_date
                .cmp(&a.upload_date)
                .then_with(|| a.document_id.cmp(&b.document_id))
        });
        documents
    }
}

/// Best-effort parse; anything missing or malformed becomes "now".
fn parse_upload_date(raw: Option<&str>) -> DateTime<Utc> {
    raw.and_then(|value| DateTime::parse_from_rfc3339(value).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
        .unwrap_or_else(Utc::now)
}
