//! Error types for the development server.
//!
//! - [`WorkbookError`] - the uploaded bytes are not a workbook container
//! - [`ServerError`] - request handling and startup errors
//!
//! [`ServerError`] converts into an HTTP response, so handlers can use `?`.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::api::types::error_response;

// =============================================================================
// Workbook Errors
// =============================================================================

/// Why uploaded bytes were refused as a workbook.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkbookError {
    /// Zero bytes.
    #[error("Uploaded file is empty")]
    Empty,

    /// Missing the ZIP local-file signature every `.xlsx` starts with.
    #[error("Not an .xlsx workbook (missing ZIP signature)")]
    NotZip,
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Malformed or oversized multipart body.
    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    /// Uploaded file is not a workbook.
    #[error("Unsupported file: {0}")]
    Workbook(#[from] WorkbookError),

    /// Failure forced with `--fail-status`.
    #[error("Simulated failure ({0})")]
    Simulated(StatusCode),

    /// Socket or file IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Multipart(e) => e.status(),
            ServerError::Workbook(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ServerError::Simulated(status) => *status,
            ServerError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.status(), Json(error_response(&self.to_string()))).into_response()
    }
}

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
