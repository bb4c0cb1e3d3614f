//! Error types for the upload/convert/download workflow.
//!
//! - [`RejectionReason`] - why the intake surface refused a file
//! - [`SubmitError`] - why a submission ended in the `Failed` state
//!
//! Rejections never reach the orchestrator; submit errors never escape it.

use thiserror::Error;

// =============================================================================
// Intake Rejections
// =============================================================================

/// Reason a dropped file was refused at intake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RejectionReason {
    /// Not an `.xlsx` workbook.
    #[error("File type must be .xlsx")]
    FileInvalidType,

    /// The drop carried more files than the surface accepts.
    #[error("Too many files")]
    TooManyFiles,
}

// =============================================================================
// Submission Errors
// =============================================================================

/// Failure of the single network exchange.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Request never completed (DNS, connection reset, CORS, ...).
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with something other than 200.
    #[error("Server error ({status}): {body}")]
    Status { status: u16, body: String },

    /// Response arrived but its body could not be read.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The multipart payload could not be built.
    #[error("Failed to build request: {0}")]
    Payload(String),

    /// The converted file could not be exposed for download.
    #[error("Failed to prepare download: {0}")]
    Resource(String),
}

impl SubmitError {
    /// Build a status error, keeping at most a short excerpt of the body.
    pub fn status(status: u16, body: &[u8]) -> Self {
        const MAX_EXCERPT: usize = 200;
        let text = String::from_utf8_lossy(body);
        let trimmed = text.trim();
        let body = if trimmed.chars().count() > MAX_EXCERPT {
            let cut: String = trimmed.chars().take(MAX_EXCERPT).collect();
            format!("{}…", cut)
        } else if trimmed.is_empty() {
            "no details".to_string()
        } else {
            trimmed.to_string()
        };
        SubmitError::Status { status, body }
    }
}

/// Result type for submission internals.
pub type SubmitResult<T> = Result<T, SubmitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_format() {
        let err = SubmitError::status(500, b"conversion crashed");
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("conversion crashed"));
    }

    #[test]
    fn test_status_error_empty_body() {
        let err = SubmitError::status(502, b"  ");
        assert_eq!(
            err,
            SubmitError::Status {
                status: 502,
                body: "no details".into()
            }
        );
    }

    #[test]
    fn test_status_error_truncates_long_body() {
        let body = "x".repeat(1000);
        match SubmitError::status(500, body.as_bytes()) {
            SubmitError::Status { body, .. } => assert_eq!(body.chars().count(), 201),
            other => panic!("unexpected {:?}", other),
        }
    }
}
