// Summary service - Use cases for reading recorded datasets
use crate::application::history_repository::{DatasetId, HistoryEntry, HistoryRepository};
use crate::application::service_error::ServiceError;
use crate::domain::equipment::EquipmentRecord;
use crate::domain::projection::Projection;
use std::sync::Arc;

#[derive(Clone)]
pub struct SummaryService {
    repository: Arc<dyn HistoryRepository>,
    max_preview_rows: usize,
}

impl SummaryService {
    pub fn new(repository: Arc<dyn HistoryRepository>, max_preview_rows: usize) -> Self {
        Self {
            repository,
            max_preview_rows,
        }
    }

    pub async fn latest(&self) -> Result<Arc<HistoryEntry>, ServiceError> {
        self.repository.latest().await.ok_or(ServiceError::NoDatasets)
    }

    pub async fn by_id(&self, id: DatasetId) -> Result<Arc<HistoryEntry>, ServiceError> {
        self.repository.get(id).await.ok_or(ServiceError::NotFound(id))
    }

    /// Retained datasets, newest first
    pub async fn history(&self) -> Vec<Arc<HistoryEntry>> {
        let mut entries = self.repository.all().await;
        entries.reverse();
        entries
    }

    pub async fn projection(&self, id: Option<DatasetId>) -> Result<(Arc<HistoryEntry>, Projection), ServiceError> {
        let entry = match id {
            Some(id) => self.by_id(id).await?,
            None => self.latest().await?,
        };
        let projection = Projection::from_summary(&entry.summary);
        Ok((entry, projection))
    }

    /// First accepted rows of a dataset, capped at the configured maximum.
    /// The entry comes back with the rows so callers never look it up twice.
    pub async fn preview(
        &self,
        id: DatasetId,
        limit: Option<usize>,
    ) -> Result<(Arc<HistoryEntry>, Vec<EquipmentRecord>), ServiceError> {
        let entry = self.by_id(id).await?;
        let limit = limit.unwrap_or(self.max_preview_rows).min(self.max_preview_rows);
        let rows = entry.dataset.records().iter().take(limit).cloned().collect();
        Ok((entry, rows))
    }
}
