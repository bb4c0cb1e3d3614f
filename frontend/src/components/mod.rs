//! UI Components for the Valuta Convert page.
//!
//! # Screens
//! - [`UploadArea`] - owns the session and switches between the two screens
//! - [`IntakePanel`] - drop surface, queued file, Convert button
//! - [`DownloadPanel`] - link to the converted workbook
//!
//! # Pieces
//! - [`WelcomeText`] - title and short explanation
//! - [`LoadingIndicator`] - spinner shown while a conversion is in flight
//! - [`BackToHome`] - navigation back to the intake screen

mod hero;
mod upload;
mod download;
mod progress;
mod back_to_home;

pub use hero::*;
pub use upload::*;
pub use download::*;
pub use progress::*;
pub use back_to_home::*;
