//! HTTP service posting the queued workbook to the conversion server.

use gloo_net::http::Request;
use web_sys::FormData;

use crate::config::UPLOAD_FIELD;
use crate::error::{SubmitError, SubmitResult};
use crate::intake::{FileContent, QueuedFile};
use crate::services::download::bytes_to_blob;

/// One file part of the multipart body.
#[derive(Clone, Debug, PartialEq)]
pub struct MultipartPart {
    /// Form field name, always [`UPLOAD_FIELD`] for queued files.
    pub field: &'static str,
    pub file_name: String,
    pub mime: String,
    pub content: FileContent,
}

impl MultipartPart {
    pub fn from_queued(file: &QueuedFile) -> Self {
        Self {
            field: UPLOAD_FIELD,
            file_name: file.name.clone(),
            mime: file.mime.clone(),
            content: file.content.clone(),
        }
    }
}

/// Raw answer of the server, body fully read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: None,
        }
    }
}

/// Network collaborator of the submission orchestrator.
///
/// Implementations issue exactly one request per call and never retry.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn post_multipart(&self, url: &str, parts: &[MultipartPart]) -> SubmitResult<HttpResponse>;
}

/// `fetch`-based transport used in the browser.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

impl GlooTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for GlooTransport {
    async fn post_multipart(&self, url: &str, parts: &[MultipartPart]) -> SubmitResult<HttpResponse> {
        let form_data = build_form_data(parts)?;

        // No explicit Content-Type: the browser adds the multipart boundary.
        let request = Request::post(url)
            .body(form_data)
            .map_err(|e| SubmitError::Payload(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        let status = response.status();
        let content_type = response.headers().get("content-type");
        let body = response
            .binary()
            .await
            .map_err(|e| SubmitError::MalformedResponse(e.to_string()))?;

        log::debug!("📥 {} answered {} ({} bytes)", url, status, body.len());

        Ok(HttpResponse {
            status,
            body,
            content_type,
        })
    }
}

fn build_form_data(parts: &[MultipartPart]) -> SubmitResult<FormData> {
    let form_data =
        FormData::new().map_err(|e| SubmitError::Payload(format!("Failed to create FormData: {:?}", e)))?;

    for part in parts {
        let appended = match &part.content {
            FileContent::Browser(file) => form_data.append_with_blob_and_filename(part.field, file, &part.file_name),
            FileContent::Bytes(bytes) => {
                let blob = bytes_to_blob(bytes, &part.mime)
                    .map_err(|e| SubmitError::Payload(format!("Failed to wrap bytes: {:?}", e)))?;
                form_data.append_with_blob_and_filename(part.field, &blob, &part.file_name)
            }
        };
        appended.map_err(|e| SubmitError::Payload(format!("Failed to append file: {:?}", e)))?;
    }

    Ok(form_data)
}
