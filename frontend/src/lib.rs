//! Valuta Convert - Frontend Rust/Leptos Application
//!
//! A WebAssembly page where a user drops one Excel workbook, sends it to
//! the conversion server and downloads the converted file, without a
//! page reload.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────────┐     ┌──────────────────┐
//! │    Intake    │────▶│ SubmissionOrchestrator│────▶│   Presentation   │
//! │ (drop/select)│     │ Idle/Submitting/...   │     │ intake | download│
//! └──────────────┘     └──────────────────────┘     └──────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`] - Endpoint resolution and intake constants
//! - [`error`] - Rejection and submission error types
//! - [`intake`] - Drop validation and the pending queue
//! - [`orchestrator`] - Submission state machine
//! - [`session`] - Intake + orchestrator kept consistent
//! - [`view`] - Pure screen derivation
//! - [`services`] - Network transport and object URLs
//! - [`components`] - Leptos UI components

use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use wasm_bindgen::prelude::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod intake;
pub mod orchestrator;
pub mod session;
pub mod view;
pub mod components;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::{ConvertConfig, Mode};

// Errors
pub use error::{RejectionReason, SubmitError, SubmitResult};

// Core
pub use intake::{CandidateFile, DragState, IntakeController, QueuedFile, RejectedFile};
pub use orchestrator::{IgnoreReason, SubmissionOrchestrator, SubmissionState, SubmitOutcome};
pub use session::ConvertSession;
pub use view::{present, Screen};

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application Entry Point
// =============================================================================

/// WASM entry point - called automatically by trunk.
#[wasm_bindgen(start)]
pub fn main() {
    // Setup panic hook for better error messages
    console_error_panic_hook::set_once();

    // Setup console logging
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🦀 Valuta Convert - Starting Leptos App");

    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Valuta Convert"/>
        <Router>
            <main class="container">
                <Routes>
                    <Route path="/" view=UploadArea/>
                </Routes>
            </main>
        </Router>
    }
}
