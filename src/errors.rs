use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::workflow::WorkflowError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("malformed token")]
    MalformedToken,

    #[error("token not found or expired")]
    TokenNotFoundOrExpired,

    #[error("report not found")]
    ReportNotFound,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<WorkflowError> for AppError {
    fn from(e: WorkflowError) -> Self {
        match e {
            WorkflowError::TokenNotFoundOrExpired => AppError::TokenNotFoundOrExpired,
            WorkflowError::ReportNotFound => AppError::ReportNotFound,
            WorkflowError::Store(e) => AppError::Internal(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, code, msg) = match &self {
            AppError::MalformedToken => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "malformed_token",
                "malformed approval token".to_string(),
            ),
            AppError::TokenNotFoundOrExpired => (
                StatusCode::NOT_FOUND,
                "not_found_error",
                "token_not_found",
                "Token not found or expired".to_string(),
            ),
            AppError::ReportNotFound => (
                StatusCode::NOT_FOUND,
                "not_found_error",
                "report_not_found",
                "Report not found".to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal_server_error",
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "message": msg,
                "type": error_type,
                "code": code,
            }
        }));

        (status, body).into_response()
    }
}
