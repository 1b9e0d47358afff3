//! Application error types.
//!
//! Provides a unified error type for all services, with conversion
//! into HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Convenience alias for results carrying an [`AppError`].
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to establish a database connection.
    #[error("Database connection failed: {0}")]
    DatabaseConnection(String),

    /// A query or statement failed after the connection was established.
    #[error("Database query failed: {0}")]
    DatabaseQuery(String),
}

impl AppError {
    /// Machine-readable error code for the response body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DatabaseConnection(_) => "DATABASE_CONNECTION_ERROR",
            AppError::DatabaseQuery(_) => "DATABASE_QUERY_ERROR",
        }
    }

    /// HTTP status code this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseConnection(_) | AppError::DatabaseQuery(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// JSON body rendered for unhandled errors.
#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::error!(code = self.code(), error = %self, "Request failed");
        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
