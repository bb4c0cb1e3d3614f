//! # Valuta devserver - local stand-in for the conversion endpoint
//!
//! The frontend posts one workbook to `POST /uploadfile` and expects the
//! converted workbook back. This crate answers that request locally so the
//! page can be developed without the real conversion service: the upload is
//! checked to be an `.xlsx` container and sent back unchanged.
//!
//! ```text
//! ┌────────────┐  multipart "file"  ┌─────────────┐
//! │  frontend  │───────────────────▶│  devserver  │
//! │  (trunk)   │◀───────────────────│ echo .xlsx  │
//! └────────────┘   200 + bytes      └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`api`] - HTTP server, payload types, and console logs

pub mod error;
pub mod api;

pub use error::{ServerError, ServerResult, WorkbookError};
pub use api::server::{router, start_server, ServerConfig};
pub use api::types::{check_workbook, HealthResponse, XLSX_MIME};
