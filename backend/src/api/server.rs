//! HTTP Server standing in for the conversion endpoint.
//!
//! # API Endpoints
//!
//! | Method | Path          | Description                              |
//! |--------|---------------|------------------------------------------|
//! | GET    | `/health`     | Health check                             |
//! | POST   | `/uploadfile` | Echo one `.xlsx` back as an attachment   |

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use super::logs::{log_error, log_info, log_success, log_warning};
use super::types::{attachment_header, check_workbook, HealthResponse, XLSX_MIME};
use crate::error::{ServerError, ServerResult};

/// Multipart field the frontend puts the workbook in.
pub const UPLOAD_FIELD: &str = "file";

/// Runtime settings of the devserver.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Largest accepted request body.
    pub max_upload_bytes: usize,
    /// Answer every upload with this status instead of echoing.
    pub fail_status: Option<StatusCode>,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8000,
            max_upload_bytes: 20 * 1024 * 1024,
            fail_status: None,
        }
    }
}

/// Build the router (CORS open so trunk's dev server can call it).
pub fn router(config: ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    let body_limit = DefaultBodyLimit::max(config.max_upload_bytes);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/uploadfile", post(upload_file))
        .layer(body_limit)
        .layer(cors)
        .with_state(Arc::new(config))
}

/// Start the HTTP server
pub async fn start_server(config: ServerConfig) -> ServerResult<()> {
    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    log_info(format!("🚀 Valuta devserver running on http://{}", addr));
    log_info("   POST /uploadfile - Echo an .xlsx workbook");
    log_info("   GET  /health     - Health check");
    if let Some(status) = config.fail_status {
        log_warning(format!("Every upload will fail with {}", status));
    }

    axum::serve(listener, router(config)).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Upload endpoint: one `file` part in, the same bytes out.
async fn upload_file(State(config): State<Arc<ServerConfig>>, mut multipart: Multipart) -> ServerResult<Response> {
    let request_id = Uuid::new_v4().simple().to_string();
    let tag = &request_id[..8];
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        if upload.is_some() {
            log_warning(format!("[{}] more than one file in request", tag));
            return Err(ServerError::BadRequest("Exactly one file per request".to_string()));
        }
        let file_name = field.file_name().unwrap_or("converted.xlsx").to_string();
        let bytes = field.bytes().await?;
        upload = Some((file_name, bytes.to_vec()));
    }

    let (file_name, bytes) = upload.ok_or_else(|| ServerError::BadRequest("No file provided".to_string()))?;
    log_info(format!("📄 [{}] {} ({} bytes)", tag, file_name, bytes.len()));

    if let Some(status) = config.fail_status {
        log_warning(format!("[{}] simulated failure {}", tag, status));
        return Err(ServerError::Simulated(status));
    }

    check_workbook(&bytes).map_err(|e| {
        log_error(format!("[{}] {}", tag, e));
        e
    })?;

    log_success(format!("[{}] echoed {}", tag, file_name));

    let headers = [
        (header::CONTENT_TYPE, XLSX_MIME.to_string()),
        (header::CONTENT_DISPOSITION, attachment_header(&file_name)),
    ];
    Ok((StatusCode::OK, headers, bytes).into_response())
}
