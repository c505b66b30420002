// Application layer - Use cases orchestrating domain and repositories
pub mod history_repository;
pub mod ingest_service;
pub mod report_service;
pub mod service_error;
pub mod summary_service;
