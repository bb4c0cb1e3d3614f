//! HTTP API module.
//!
//! This module provides the HTTP server and API types for the devserver.

pub mod server;
pub mod types;
pub mod logs;

pub use server::start_server;
pub use types::*;
pub use logs::*;
