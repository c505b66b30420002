// Application state for HTTP handlers
use crate::application::ingest_service::IngestService;
use crate::application::report_service::ReportService;
use crate::application::summary_service::SummaryService;

#[derive(Clone)]
pub struct AppState {
    pub ingest_service: IngestService,
    pub summary_service: SummaryService,
    pub report_service: ReportService,
}
