use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quizext_canvas::CanvasError;
use serde_json::json;

use crate::session::SessionRejection;

/// Application-level error type for JSON handlers.
///
/// Store and Canvas failures of the JSON endpoints. Implements
/// [`IntoResponse`] to produce consistent JSON error responses.
/// LTI and session failures have their own HTML responses, see
/// [`crate::lti::LtiError`] and [`crate::session::SessionRejection`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Canvas error: {0}")]
    Canvas(#[from] CanvasError),

    #[error(transparent)]
    Session(#[from] SessionRejection),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Session(rejection) => return rejection.clone().into_response(),

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::Canvas(err) => classify_canvas_error(err),

            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

/// A Canvas 404 is the caller's problem (unknown course or user); anything
/// else means Canvas let us down.
fn classify_canvas_error(err: &CanvasError) -> (StatusCode, &'static str, String) {
    match err {
        CanvasError::NotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Not found in Canvas".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Canvas request failed");
            (
                StatusCode::BAD_GATEWAY,
                "CANVAS_ERROR",
                "Canvas request failed".to_string(),
            )
        }
    }
}

impl From<quizext_worker::WorkerError> for AppError {
    fn from(err: quizext_worker::WorkerError) -> Self {
        use quizext_worker::WorkerError;

        match err {
            WorkerError::Database(e) => AppError::Database(e),
            WorkerError::Canvas(e) => AppError::Canvas(e),
            WorkerError::InvalidJob(msg) => AppError::InternalError(msg),
        }
    }
}
