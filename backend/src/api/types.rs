//! Payload types and workbook checks for the devserver API.

use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::WorkbookError;

/// MIME type of an Office Open XML workbook.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// ZIP local file header; every `.xlsx` starts with it.
const ZIP_SIGNATURE: &[u8] = b"PK\x03\x04";

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub upload_endpoint: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok",
            service: "valuta-devserver",
            version: env!("CARGO_PKG_VERSION"),
            upload_endpoint: "POST /uploadfile",
        }
    }
}

/// Check that uploaded bytes look like an `.xlsx` container.
pub fn check_workbook(bytes: &[u8]) -> Result<(), WorkbookError> {
    if bytes.is_empty() {
        return Err(WorkbookError::Empty);
    }
    if !bytes.starts_with(ZIP_SIGNATURE) {
        return Err(WorkbookError::NotZip);
    }
    Ok(())
}

/// `Content-Disposition` value for the echoed workbook.
pub fn attachment_header(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}

/// Create an error response body.
pub fn error_response(error: &str) -> Value {
    json!({
        "requestId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_workbook() {
        assert_eq!(check_workbook(b"PK\x03\x04rest"), Ok(()));
        assert_eq!(check_workbook(b""), Err(WorkbookError::Empty));
        assert_eq!(check_workbook(b"a,b,c\n"), Err(WorkbookError::NotZip));
    }

    #[test]
    fn test_attachment_header_escapes_quotes() {
        assert_eq!(
            attachment_header("my \"report\".xlsx"),
            "attachment; filename=\"my _report_.xlsx\""
        );
    }

    #[test]
    fn test_error_response_shape() {
        let body = error_response("No file provided");
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], "No file provided");
        assert!(body["requestId"].as_str().is_some());
    }

    #[test]
    fn test_health_serializes_camel_case() {
        let json = serde_json::to_value(HealthResponse::default()).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["uploadEndpoint"], "POST /uploadfile");
    }
}
