//! Console logging for the devserver.
//!
//! Every request is logged as one timestamped, emoji-prefixed line so the
//! output reads well next to trunk's own log.

use chrono::Local;

/// Log level for console display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    fn prefix(self) -> &'static str {
        match self {
            LogLevel::Info => "  ",
            LogLevel::Success => "✓",
            LogLevel::Warning => "⚠️",
            LogLevel::Error => "❌",
        }
    }
}

/// Format a log line without printing it.
pub fn format_line(level: LogLevel, message: &str) -> String {
    format!("[{}] {} {}", Local::now().format("%H:%M:%S"), level.prefix(), message)
}

/// Print a log line; warnings and errors go to stderr.
pub fn log(level: LogLevel, message: impl AsRef<str>) {
    let line = format_line(level, message.as_ref());
    match level {
        LogLevel::Warning | LogLevel::Error => eprintln!("{}", line),
        _ => println!("{}", line),
    }
}

pub fn log_info(msg: impl AsRef<str>) {
    log(LogLevel::Info, msg);
}

pub fn log_success(msg: impl AsRef<str>) {
    log(LogLevel::Success, msg);
}

pub fn log_warning(msg: impl AsRef<str>) {
    log(LogLevel::Warning, msg);
}

pub fn log_error(msg: impl AsRef<str>) {
    log(LogLevel::Error, msg);
}
