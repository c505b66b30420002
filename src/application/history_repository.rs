// Repository trait for dataset history access
use crate::domain::equipment::Dataset;
use crate::domain::summary::Summary;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifier assigned to a dataset when it enters the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(pub u64);

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A dataset and the summary computed from it, always stored together.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub id: DatasetId,
    pub dataset: Dataset,
    pub summary: Summary,
}

#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Append a dataset, evicting the oldest entry once capacity is exceeded
    async fn record(&self, dataset: Dataset, summary: Summary) -> DatasetId;

    /// Most recently recorded entry
    async fn latest(&self) -> Option<Arc<HistoryEntry>>;

    /// Entry by id, if it has not been evicted
    async fn get(&self, id: DatasetId) -> Option<Arc<HistoryEntry>>;

    /// Every retained entry, oldest first
    async fn all(&self) -> Vec<Arc<HistoryEntry>>;
}
