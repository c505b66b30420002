// Response shapes returned by the HTTP handlers
use crate::application::history_repository::{DatasetId, HistoryEntry};
use crate::application::ingest_service::IngestOutcome;
use crate::domain::equipment::EquipmentRecord;
use crate::domain::projection::Projection;
use crate::domain::summary::Summary;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RowErrorView {
    pub line: u64,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct UploadView<'a> {
    pub id: DatasetId,
    pub name: &'a str,
    pub uploaded_at: DateTime<Utc>,
    pub summary: &'a Summary,
    pub accepted: usize,
    pub rejected: usize,
    pub errors: Vec<RowErrorView>,
}

impl<'a> From<&'a IngestOutcome> for UploadView<'a> {
    fn from(outcome: &'a IngestOutcome) -> Self {
        Self {
            id: outcome.id,
            name: &outcome.name,
            uploaded_at: outcome.uploaded_at,
            summary: &outcome.summary,
            accepted: outcome.accepted,
            rejected: outcome.rejected,
            errors: outcome
                .errors
                .iter()
                .map(|e| RowErrorView {
                    line: e.line,
                    reason: e.kind.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DatasetView<'a> {
    pub id: DatasetId,
    pub name: &'a str,
    pub uploaded_at: DateTime<Utc>,
    pub raw_row_count: usize,
    pub summary: &'a Summary,
}

impl<'a> From<&'a HistoryEntry> for DatasetView<'a> {
    fn from(entry: &'a HistoryEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.dataset.name(),
            uploaded_at: entry.dataset.uploaded_at(),
            raw_row_count: entry.dataset.raw_row_count(),
            summary: &entry.summary,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectionView<'a> {
    pub id: DatasetId,
    pub name: &'a str,
    #[serde(flatten)]
    pub projection: Projection,
}

#[derive(Debug, Serialize)]
pub struct PreviewView<'a> {
    pub id: DatasetId,
    pub name: &'a str,
    pub rows: Vec<EquipmentRecord>,
}
