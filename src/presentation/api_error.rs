// Mapping of service failures onto HTTP responses
use crate::application::report_service::ExportError;
use crate::application::service_error::ServiceError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug)]
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        ApiError(e)
    }
}

impl From<ExportError> for ApiError {
    fn from(e: ExportError) -> Self {
        ApiError(ServiceError::Export(e))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ServiceError::Parse(_) => StatusCode::BAD_REQUEST,
            ServiceError::NoDatasets | ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Export(ExportError::Precondition(_)) => StatusCode::CONFLICT,
            ServiceError::Export(ExportError::Snapshot(_) | ExportError::Encode(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn detail(&self) -> String {
        self.0.to_string()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.detail());
        }
        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::history_repository::DatasetId;
    use crate::infrastructure::csv_parser::ParseError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::from(ServiceError::Parse(ParseError::EmptyInput)), StatusCode::BAD_REQUEST),
            (ApiError::from(ServiceError::NoDatasets), StatusCode::NOT_FOUND),
            (ApiError::from(ServiceError::NotFound(DatasetId(3))), StatusCode::NOT_FOUND),
            (
                ApiError::from(ExportError::Precondition("nothing".into())),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::from(ExportError::Snapshot(anyhow::anyhow!("gone"))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.status(), status);
        }
    }

    #[test]
    fn test_wrapped_export_errors_keep_their_status() {
        let refused = ApiError::from(ServiceError::from(ExportError::Precondition(
            "no dataset has been uploaded".into(),
        )));
        assert_eq!(refused.status(), StatusCode::CONFLICT);
        assert_eq!(refused.detail(), "Nothing to export: no dataset has been uploaded");

        let broken = ApiError::from(ServiceError::Export(ExportError::Snapshot(anyhow::anyhow!("gone"))));
        assert_eq!(broken.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_detail_is_verbatim() {
        let error = ApiError::from(ServiceError::Parse(ParseError::EmptyInput));
        assert_eq!(error.detail(), "CSV parse error: Upload contains no usable content");
    }
}
