// HTTP request handlers
use crate::application::history_repository::DatasetId;
use crate::infrastructure::http_response::{accepts_brotli, document_response, json_response};
use crate::presentation::api_error::ApiError;
use crate::presentation::app_state::AppState;
use crate::presentation::views::{DatasetView, PreviewView, ProjectionView, UploadView};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct UploadQuery {
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct PreviewQuery {
    pub limit: Option<usize>,
}

async fn respond<T: Serialize>(status: StatusCode, data: &T, headers: &HeaderMap) -> Response {
    match json_response(status, data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Parse, summarize and record an uploaded CSV body
pub async fn upload_dataset(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: String,
) -> Response {
    match state
        .ingest_service
        .ingest(query.name.as_deref(), &body, Utc::now())
        .await
    {
        Ok(outcome) => respond(StatusCode::CREATED, &UploadView::from(&outcome), &headers).await,
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Summary of the most recent dataset
pub async fn latest_summary(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    match state.summary_service.latest().await {
        Ok(entry) => respond(StatusCode::OK, &DatasetView::from(entry.as_ref()), &headers).await,
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Summary of a specific dataset
pub async fn summary_by_id(
    Path(id): Path<u64>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    match state.summary_service.by_id(DatasetId(id)).await {
        Ok(entry) => respond(StatusCode::OK, &DatasetView::from(entry.as_ref()), &headers).await,
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Retained datasets, newest first
pub async fn history(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let entries = state.summary_service.history().await;
    let views: Vec<DatasetView> = entries.iter().map(|e| DatasetView::from(e.as_ref())).collect();
    respond(StatusCode::OK, &views, &headers).await
}

/// Chart-ready projection of the latest dataset
pub async fn latest_projection(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    projection_response(&state, None, &headers).await
}

/// Chart-ready projection of a specific dataset
pub async fn projection_by_id(
    Path(id): Path<u64>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    projection_response(&state, Some(DatasetId(id)), &headers).await
}

async fn projection_response(state: &AppState, id: Option<DatasetId>, headers: &HeaderMap) -> Response {
    match state.summary_service.projection(id).await {
        Ok((entry, projection)) => {
            let view = ProjectionView {
                id: entry.id,
                name: entry.dataset.name(),
                projection,
            };
            respond(StatusCode::OK, &view, headers).await
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// First rows of a dataset, for table previews
pub async fn dataset_preview(
    Path(id): Path<u64>,
    Query(query): Query<PreviewQuery>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Response {
    match state.summary_service.preview(DatasetId(id), query.limit).await {
        Ok((entry, rows)) => {
            let view = PreviewView {
                id: entry.id,
                name: entry.dataset.name(),
                rows,
            };
            respond(StatusCode::OK, &view, &headers).await
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Report document for the latest dataset
pub async fn latest_report(State(state): State<Arc<AppState>>) -> Response {
    report_response(&state, None).await
}

/// Report document for a specific dataset
pub async fn report_by_id(Path(id): Path<u64>, State(state): State<Arc<AppState>>) -> Response {
    report_response(&state, Some(DatasetId(id))).await
}

async fn report_response(state: &AppState, id: Option<DatasetId>) -> Response {
    match state.report_service.export(id).await {
        Ok(artifact) => match document_response(artifact) {
            Ok(response) => response,
            Err(status) => status.into_response(),
        },
        Err(e) => ApiError::from(e).into_response(),
    }
}
