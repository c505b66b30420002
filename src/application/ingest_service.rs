// Ingest service - Use case for turning an upload into a recorded summary
use crate::application::history_repository::{DatasetId, HistoryRepository};
use crate::application::service_error::ServiceError;
use crate::domain::equipment::Dataset;
use crate::domain::summary::Summary;
use crate::infrastructure::csv_parser::{RowError, parse_equipment_csv};
use chrono::{DateTime, Utc};
use std::sync::Arc;

const DEFAULT_DATASET_NAME: &str = "dataset.csv";

/// Result of a successful upload, including the rows that were turned away.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub id: DatasetId,
    pub name: String,
    pub uploaded_at: DateTime<Utc>,
    pub summary: Summary,
    pub accepted: usize,
    pub rejected: usize,
    pub errors: Vec<RowError>,
}

#[derive(Clone)]
pub struct IngestService {
    repository: Arc<dyn HistoryRepository>,
}

impl IngestService {
    pub fn new(repository: Arc<dyn HistoryRepository>) -> Self {
        Self { repository }
    }

    pub async fn ingest(
        &self,
        name: Option<&str>,
        raw: &str,
        uploaded_at: DateTime<Utc>,
    ) -> Result<IngestOutcome, ServiceError> {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_DATASET_NAME)
            .to_string();

        let parsed = parse_equipment_csv(raw).inspect_err(|e| {
            tracing::warn!("Rejected upload {}: {}", name, e);
        })?;

        let summary = Summary::from_records(&parsed.records);
        let accepted = parsed.records.len();
        let rejected = parsed.errors.len();
        let dataset = Dataset::new(name.clone(), uploaded_at, parsed.raw_row_count, parsed.records);

        let id = self.repository.record(dataset, summary.clone()).await;
        tracing::info!(
            "Recorded dataset {} ({}): {} accepted, {} rejected",
            id,
            name,
            accepted,
            rejected
        );

        Ok(IngestOutcome {
            id,
            name,
            uploaded_at,
            summary,
            accepted,
            rejected,
            errors: parsed.errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::equipment::Parameter;
    use crate::infrastructure::csv_parser::{ParseError, RowErrorKind};
    use crate::infrastructure::memory_history::InMemoryHistory;
    use std::num::NonZeroUsize;

    fn service() -> (IngestService, Arc<InMemoryHistory>) {
        let repository = Arc::new(InMemoryHistory::new(NonZeroUsize::new(5).unwrap()));
        (IngestService::new(repository.clone()), repository)
    }

    #[tokio::test]
    async fn test_ingest_records_summary() {
        let (service, repository) = service();
        let raw = "name,type,flowrate,pressure,temperature\nPump A,Pump,10,2,30\nValve B,Valve,5,1,20\n";

        let outcome = service.ingest(Some("plant.csv"), raw, Utc::now()).await.unwrap();

        assert_eq!(outcome.accepted, 2);
        assert_eq!(outcome.rejected, 0);
        assert_eq!(outcome.summary.averages.get(Parameter::Flowrate), 7.5);

        let latest = repository.latest().await.unwrap();
        assert_eq!(latest.id, outcome.id);
        assert_eq!(latest.dataset.name(), "plant.csv");
        assert_eq!(latest.summary, outcome.summary);
    }

    #[tokio::test]
    async fn test_bad_rows_are_reported_alongside_summary() {
        let (service, repository) = service();
        let raw = "name,type,flowrate,pressure,temperature\nPump A,Pump,10,2,30\nShort,Valve,5,1\nValve B,Valve,5,1,20\n";

        let outcome = service.ingest(None, raw, Utc::now()).await.unwrap();

        assert_eq!(outcome.name, "dataset.csv");
        assert_eq!(outcome.accepted, 2);
        assert_eq!(outcome.rejected, 1);
        assert_eq!(outcome.errors[0].line, 3);
        assert_eq!(
            outcome.errors[0].kind,
            RowErrorKind::FieldCount { expected: 5, found: 4 }
        );
        assert_eq!(outcome.summary.total_count, 2);
        assert_eq!(repository.latest().await.unwrap().dataset.raw_row_count(), 3);
    }

    #[tokio::test]
    async fn test_empty_upload_records_nothing() {
        let (service, repository) = service();

        let err = service.ingest(Some("empty.csv"), "", Utc::now()).await.unwrap_err();

        assert!(matches!(err, ServiceError::Parse(ParseError::EmptyInput)));
        assert!(repository.latest().await.is_none());
    }

    #[tokio::test]
    async fn test_header_only_upload_is_recorded_as_empty_dataset() {
        let (service, repository) = service();

        let outcome = service
            .ingest(Some("blank.csv"), "name,type,flowrate,pressure,temperature\n", Utc::now())
            .await
            .unwrap();

        assert_eq!(outcome.summary.total_count, 0);
        assert_eq!(repository.latest().await.unwrap().summary.total_count, 0);
    }
}
