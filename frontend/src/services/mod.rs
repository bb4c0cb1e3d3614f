//! Browser-facing services.
//!
//! # Services
//!
//! - [`convert`] - multipart POST to the conversion server
//! - [`download`] - object URL lifecycle of the converted workbook
//!
//! Both sit behind a trait ([`Transport`], [`ResourceRegistry`]) so the
//! orchestrator can be driven by in-memory stand-ins outside the browser.

pub mod convert;
pub mod download;

pub use convert::*;
pub use download::*;
