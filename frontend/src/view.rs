//! Presentation Surface - which screen to show, as plain data.
//!
//! [`present`] is a pure function of the submission state and the intake
//! lists; the Leptos components only paint what it returns.

use crate::intake::IntakeController;
use crate::orchestrator::SubmissionState;

/// The two mutually exclusive screens.
#[derive(Clone, Debug, PartialEq)]
pub enum Screen {
    Intake(IntakeView),
    Download(DownloadView),
}

/// Drop surface, queued files, and the Convert button.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntakeView {
    pub files: Vec<FileRow>,
    pub rejection: Option<&'static str>,
    pub submit_enabled: bool,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FileRow {
    pub name: String,
    pub size: String,
}

/// Download link for the converted workbook.
#[derive(Clone, Debug, PartialEq)]
pub struct DownloadView {
    pub href: String,
    pub file_name: String,
}

/// Derive the screen from the current state.
pub fn present(state: &SubmissionState, intake: &IntakeController) -> Screen {
    if let SubmissionState::Succeeded(resource) = state {
        return Screen::Download(DownloadView {
            href: resource.handle.as_str().to_string(),
            file_name: resource.file_name.clone(),
        });
    }

    let loading = state.is_submitting();
    Screen::Intake(IntakeView {
        files: intake
            .queue()
            .iter()
            .map(|file| FileRow {
                name: file.name.clone(),
                size: format_size(file.size),
            })
            .collect(),
        rejection: intake.rejection_message(),
        submit_enabled: !intake.is_empty() && !loading,
        loading,
        error: state.error().map(|e| e.to_string()),
    })
}

/// Human readable file size (`812 B`, `14.2 KB`, `3.0 MB`).
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{} B", bytes)
    } else if b < MB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / MB)
    }
}
