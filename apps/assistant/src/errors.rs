use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::api_client::ApiError;
use crate::export::ExportError;

/// Message shown to the user whenever a resume download fails.
pub const EXPORT_FAILED_MESSAGE: &str = "Failed to download resume, please try again.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Upstream error: {0}")]
    Upstream(#[from] ApiError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Upstream(e @ ApiError::InvalidJobId(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
            }
            AppError::Upstream(e) => {
                tracing::error!("Upstream API error: {e}");
                let status = match e {
                    ApiError::Request { status, .. } if *status == 401 => StatusCode::UNAUTHORIZED,
                    ApiError::Request { status, .. } if *status == 404 => StatusCode::NOT_FOUND,
                    _ => StatusCode::BAD_GATEWAY,
                };
                (status, "UPSTREAM_ERROR", e.to_string())
            }
            AppError::Export(e) => {
                tracing::error!("Resume export failed: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_FAILED",
                    EXPORT_FAILED_MESSAGE.to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_error_maps_to_retry_message() {
        let response = AppError::Export(ExportError::EmptyCapture).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_upstream_not_found_passes_status_through() {
        let err = AppError::Upstream(ApiError::Request {
            status: 404,
            status_text: "Not Found".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_upstream_server_error_is_bad_gateway() {
        let err = AppError::Upstream(ApiError::Request {
            status: 503,
            status_text: "Service Unavailable".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_invalid_job_id_is_bad_request() {
        let err = AppError::Upstream(ApiError::InvalidJobId("..".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_conflict_status() {
        let err = AppError::Conflict("busy".to_string());
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }
}
