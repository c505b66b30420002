// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::ingest_service::IngestService;
use crate::application::report_service::{ReportExporter, ReportService};
use crate::application::summary_service::SummaryService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::memory_history::InMemoryHistory;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    dataset_preview, health_check, history, latest_projection, latest_report, latest_summary,
    projection_by_id, report_by_id, summary_by_id, upload_dataset,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(InMemoryHistory::new(config.history.capacity()?));

    // Create services (application layer)
    let ingest_service = IngestService::new(repository.clone());
    let summary_service = SummaryService::new(repository.clone(), config.preview.max_rows);
    let report_service = ReportService::new(
        repository.clone(),
        ReportExporter::new(config.report.page_size()),
        (config.report.surface_width, config.report.surface_height),
    );

    // Create application state
    let state = Arc::new(AppState {
        ingest_service,
        summary_service,
        report_service,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/upload", post(upload_dataset))
        .route("/summary", get(latest_summary))
        .route("/summary/:id", get(summary_by_id))
        .route("/history", get(history))
        .route("/projection", get(latest_projection))
        .route("/projection/:id", get(projection_by_id))
        .route("/preview/:id", get(dataset_preview))
        .route("/report", get(latest_report))
        .route("/report/:id", get(report_by_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind_address
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", config.server.bind_address))?;
    tracing::info!(
        "Starting equipment-visualizer on {} (history capacity {})",
        addr,
        repository.capacity()
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
