//! Intake Controller - drop/select validation and the pending queue.
//!
//! The browser primitive hands over whatever the user dropped; [`filter_drop`]
//! splits it into accepted and rejected files and [`IntakeController`] keeps
//! the queue (at most [`MAX_FILES`] entries) and the latest rejections.

use std::rc::Rc;

use crate::config::{MAX_FILES, XLSX_EXTENSION, XLSX_MIME};
use crate::error::RejectionReason;

// =============================================================================
// File Types
// =============================================================================

/// Binary content of a candidate file.
#[derive(Clone, Debug, PartialEq)]
pub enum FileContent {
    /// Bytes already in memory.
    Bytes(Rc<[u8]>),
    /// A file handed over by the browser (drop or `<input type="file">`).
    Browser(web_sys::File),
}

/// A file yielded by the drop/select primitive, not yet validated.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateFile {
    pub name: String,
    /// MIME type reported by the platform (may be empty).
    pub mime: String,
    pub size: u64,
    pub content: FileContent,
}

impl CandidateFile {
    /// In-memory candidate.
    pub fn from_bytes(name: impl Into<String>, mime: impl Into<String>, bytes: impl Into<Rc<[u8]>>) -> Self {
        let bytes: Rc<[u8]> = bytes.into();
        Self {
            name: name.into(),
            mime: mime.into(),
            size: bytes.len() as u64,
            content: FileContent::Bytes(bytes),
        }
    }

    /// Candidate backed by a browser `File`.
    pub fn from_browser(file: web_sys::File) -> Self {
        Self {
            name: file.name(),
            mime: file.type_(),
            size: file.size() as u64,
            content: FileContent::Browser(file),
        }
    }
}

/// Collect the files of a `FileList` (drop payload or file input).
pub fn candidates_from_list(list: &web_sys::FileList) -> Vec<CandidateFile> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(CandidateFile::from_browser)
        .collect()
}

/// A file waiting in the queue for submission.
#[derive(Clone, Debug, PartialEq)]
pub struct QueuedFile {
    /// Unique key within the queue.
    pub name: String,
    pub mime: String,
    pub size: u64,
    pub content: FileContent,
}

impl From<CandidateFile> for QueuedFile {
    fn from(file: CandidateFile) -> Self {
        Self {
            name: file.name,
            mime: file.mime,
            size: file.size,
            content: file.content,
        }
    }
}

/// A file refused at intake, with every reason that applied.
#[derive(Clone, Debug, PartialEq)]
pub struct RejectedFile {
    pub file: CandidateFile,
    pub reasons: Vec<RejectionReason>,
}

/// Result of running a drop through the intake filter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DropOutcome {
    pub accepted: Vec<CandidateFile>,
    pub rejected: Vec<RejectedFile>,
}

// =============================================================================
// Platform Filter
// =============================================================================

/// Whether a file matches the `.xlsx` type filter (MIME or extension).
pub fn accepts(file: &CandidateFile) -> bool {
    file.mime == XLSX_MIME || file.name.to_ascii_lowercase().ends_with(XLSX_EXTENSION)
}

/// Split a drop into accepted and rejected files.
///
/// A drop carrying more than [`MAX_FILES`] files is refused as a whole.
pub fn filter_drop(candidates: Vec<CandidateFile>) -> DropOutcome {
    let too_many = candidates.len() > MAX_FILES;
    let mut outcome = DropOutcome::default();

    for file in candidates {
        let mut reasons = Vec::new();
        if !accepts(&file) {
            reasons.push(RejectionReason::FileInvalidType);
        }
        if too_many {
            reasons.push(RejectionReason::TooManyFiles);
        }

        if reasons.is_empty() {
            outcome.accepted.push(file);
        } else {
            outcome.rejected.push(RejectedFile { file, reasons });
        }
    }

    outcome
}

// =============================================================================
// Controller
// =============================================================================

/// Owns the pending queue and the rejection list of the last drop.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntakeController {
    queue: Vec<QueuedFile>,
    rejected: Vec<RejectedFile>,
}

impl IntakeController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a filtered drop.
    ///
    /// Accepted files replace the queue only when there are some; rejections
    /// always replace the previous rejection list, even with an empty one.
    pub fn on_drop(&mut self, outcome: DropOutcome) {
        if !outcome.accepted.is_empty() {
            self.queue = outcome.accepted.into_iter().map(QueuedFile::from).collect();
        }
        for rejection in &outcome.rejected {
            log::warn!("⚠️ Rejected {}: {:?}", rejection.file.name, rejection.reasons);
        }
        self.rejected = outcome.rejected;
    }

    /// Filter raw candidates and apply them.
    pub fn drop_files(&mut self, candidates: Vec<CandidateFile>) {
        self.on_drop(filter_drop(candidates));
    }

    /// Remove a queued file by name. Absent names are ignored.
    pub fn remove_file(&mut self, name: &str) {
        self.queue.retain(|file| file.name != name);
    }

    /// Drop the queue and any rejection message.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.rejected.clear();
    }

    pub fn queue(&self) -> &[QueuedFile] {
        &self.queue
    }

    pub fn rejected(&self) -> &[RejectedFile] {
        &self.rejected
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Owned copy for rendering.
    pub fn snapshot(&self) -> IntakeController {
        self.clone()
    }

    /// Message for the current rejection list, if any.
    ///
    /// A count violation is reported over a type mismatch.
    pub fn rejection_message(&self) -> Option<&'static str> {
        if self.rejected.is_empty() {
            return None;
        }
        let too_many = self
            .rejected
            .iter()
            .any(|r| r.reasons.contains(&RejectionReason::TooManyFiles));
        if too_many {
            Some("Je kan maar één bestand tegelijkertijd uploaden")
        } else {
            Some("Alleen Excel-bestanden (.xlsx) worden ondersteund")
        }
    }
}

// =============================================================================
// Drag Hover
// =============================================================================

/// Hover flag for the drop surface.
///
/// Browsers fire `dragenter`/`dragleave` for every child element, so the
/// flag is backed by a depth counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DragState {
    depth: u32,
}

impl DragState {
    pub fn enter(&mut self) {
        self.depth += 1;
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Called on drop or when the gesture is cancelled.
    pub fn reset(&mut self) {
        self.depth = 0;
    }

    pub fn is_active(&self) -> bool {
        self.depth > 0
    }
}
