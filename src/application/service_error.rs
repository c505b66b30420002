// Errors surfaced by the application services
use crate::application::history_repository::DatasetId;
use crate::application::report_service::ExportError;
use crate::infrastructure::csv_parser::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("CSV parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("No datasets")]
    NoDatasets,

    #[error("Dataset {0} not found")]
    NotFound(DatasetId),

    #[error(transparent)]
    Export(#[from] ExportError),
}
