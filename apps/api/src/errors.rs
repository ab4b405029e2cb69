use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::evaluation::EvalError;
use crate::pipeline::batch::BatchFailure;
use crate::pipeline::session::SessionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    /// The request is valid but the session is not in a state that allows it.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvalError),

    /// Every call in a batch failed; nothing was written back.
    #[error("{operation} failed for all {} items", failures.len())]
    BatchFailed {
        operation: String,
        failures: Vec<BatchFailure>,
    },
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::UnknownCandidate(_) => AppError::NotFound(err.to_string()),
            _ => AppError::Conflict(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Evaluation(EvalError::Declined(msg)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EVALUATION_DECLINED",
                msg.clone(),
            ),
            AppError::Evaluation(e) => {
                tracing::error!("Evaluation error: {e}");
                (StatusCode::BAD_GATEWAY, "EVALUATION_ERROR", e.to_string())
            }
            AppError::BatchFailed { failures, .. } => {
                tracing::error!("{message}");
                let body = Json(json!({
                    "error": {
                        "code": "BATCH_FAILED",
                        "message": message,
                        "failures": failures,
                    }
                }));
                return (StatusCode::BAD_GATEWAY, body).into_response();
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
