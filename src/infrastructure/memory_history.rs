// In-memory history repository - Bounded FIFO of recent datasets
use crate::application::history_repository::{DatasetId, HistoryEntry, HistoryRepository};
use crate::domain::equipment::Dataset;
use crate::domain::summary::Summary;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug)]
struct HistoryState {
    next_id: u64,
    entries: VecDeque<Arc<HistoryEntry>>,
}

#[derive(Debug)]
pub struct InMemoryHistory {
    capacity: NonZeroUsize,
    state: RwLock<HistoryState>,
}

impl InMemoryHistory {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            state: RwLock::new(HistoryState {
                next_id: 1,
                entries: VecDeque::with_capacity(capacity.get()),
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistory {
    async fn record(&self, dataset: Dataset, summary: Summary) -> DatasetId {
        // Size check, eviction and append all happen under one write guard.
        let mut state = self.state.write().await;

        let id = DatasetId(state.next_id);
        state.next_id += 1;

        while state.entries.len() >= self.capacity.get() {
            if let Some(evicted) = state.entries.pop_front() {
                tracing::info!(
                    "Evicted dataset {} ({}) from history",
                    evicted.id,
                    evicted.dataset.name()
                );
            }
        }

        state.entries.push_back(Arc::new(HistoryEntry {
            id,
            dataset,
            summary,
        }));
        id
    }

    async fn latest(&self) -> Option<Arc<HistoryEntry>> {
        self.state.read().await.entries.back().cloned()
    }

    async fn get(&self, id: DatasetId) -> Option<Arc<HistoryEntry>> {
        self.state
            .read()
            .await
            .entries
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
    }

    async fn all(&self) -> Vec<Arc<HistoryEntry>> {
        self.state.read().await.entries.iter().cloned().collect()
    }
}
