use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::changes::validation::ChangeListError;
use crate::models::resume::DocumentError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The response belonged to a superseded or cancelled request.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The tailoring call failed; the previously published state is intact.
    #[error("Tailoring failed: {0}")]
    Tailoring(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<DocumentError> for AppError {
    fn from(e: DocumentError) -> Self {
        AppError::Validation(format!("invalid résumé document: {e}"))
    }
}

impl From<ChangeListError> for AppError {
    fn from(e: ChangeListError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String, bool) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), false),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                false,
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "STALE_REQUEST", msg.clone(), true),
            AppError::Tailoring(msg) => {
                tracing::warn!("Tailoring error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "TAILORING_FAILED",
                    format!("Could not generate suggestions: {msg}"),
                    true,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    false,
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, retryable) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
                "retryable": retryable
            }
        }));

        (status, body).into_response()
    }
}
