//! Application configuration.
//!
//! The conversion endpoint is baked in at build time. Trunk exports
//! `VALUTA_SERVER_PROD` / `VALUTA_SERVER_LOCAL` from the environment and the
//! build profile decides which one is used.

/// MIME type of an Office Open XML workbook.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// File extension accepted by the intake surface.
pub const XLSX_EXTENSION: &str = ".xlsx";

/// Maximum number of files a single drop may carry.
pub const MAX_FILES: usize = 1;

/// Multipart field name the conversion server reads the workbook from.
pub const UPLOAD_FIELD: &str = "file";

/// Path of the conversion endpoint, relative to the server base URL.
pub const UPLOAD_PATH: &str = "/uploadfile";

/// Fallback production server when `VALUTA_SERVER_PROD` is not set at build time.
pub const DEFAULT_SERVER_PROD: &str = "https://api.valuta-convert.nl";

/// Fallback local server, matching the devserver's default port.
pub const DEFAULT_SERVER_LOCAL: &str = "http://localhost:8000";

/// Build mode used to pick the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Production,
    Local,
}

impl Mode {
    /// Release builds talk to production, debug builds to the local server.
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            Mode::Local
        } else {
            Mode::Production
        }
    }
}

/// Endpoint configuration injected into the submission orchestrator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Server base URL, e.g. `http://localhost:8000`.
    pub endpoint: String,
}

impl ConvertConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    /// Resolve the endpoint for a build mode.
    pub fn for_mode(mode: Mode) -> Self {
        let endpoint = match mode {
            Mode::Production => option_env!("VALUTA_SERVER_PROD").unwrap_or(DEFAULT_SERVER_PROD),
            Mode::Local => option_env!("VALUTA_SERVER_LOCAL").unwrap_or(DEFAULT_SERVER_LOCAL),
        };
        Self::new(endpoint)
    }

    /// Full URL of the conversion endpoint.
    pub fn upload_url(&self) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), UPLOAD_PATH)
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self::for_mode(Mode::current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_url_joins_path() {
        let config = ConvertConfig::new("http://localhost:8000");
        assert_eq!(config.upload_url(), "http://localhost:8000/uploadfile");
    }

    #[test]
    fn test_upload_url_trailing_slash() {
        let config = ConvertConfig::new("https://convert.example/");
        assert_eq!(config.upload_url(), "https://convert.example/uploadfile");
    }

    #[test]
    fn test_mode_selects_distinct_endpoints() {
        // Without build-time overrides both fall back to their defaults.
        let local = ConvertConfig::for_mode(Mode::Local);
        assert!(!local.endpoint.is_empty());
        if option_env!("VALUTA_SERVER_LOCAL").is_none() {
            assert_eq!(local.endpoint, DEFAULT_SERVER_LOCAL);
        }
        if option_env!("VALUTA_SERVER_PROD").is_none() {
            assert_eq!(ConvertConfig::for_mode(Mode::Production).endpoint, DEFAULT_SERVER_PROD);
        }
    }

    #[test]
    fn test_debug_build_is_local() {
        assert_eq!(Mode::current() == Mode::Local, cfg!(debug_assertions));
    }
}
