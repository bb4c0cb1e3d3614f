//! One intake queue bound to one submission orchestrator.
//!
//! The session keeps the screen consistent: when a conversion succeeds the
//! queue is emptied before any other subscriber hears about it, and going
//! home clears both the queue and the download.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::ConvertConfig;
use crate::intake::{CandidateFile, IntakeController};
use crate::orchestrator::{SubmissionOrchestrator, SubmissionState, SubmitOutcome};
use crate::services::{ResourceRegistry, Transport};
use crate::view::{present, Screen};

pub struct ConvertSession<T, R: ResourceRegistry> {
    intake: Rc<RefCell<IntakeController>>,
    orchestrator: SubmissionOrchestrator<T, R>,
}

impl<T, R: ResourceRegistry> Clone for ConvertSession<T, R> {
    fn clone(&self) -> Self {
        Self {
            intake: Rc::clone(&self.intake),
            orchestrator: self.orchestrator.clone(),
        }
    }
}

impl<T: Transport, R: ResourceRegistry> ConvertSession<T, R> {
    pub fn new(config: ConvertConfig, transport: T, registry: R) -> Self {
        let orchestrator = SubmissionOrchestrator::new(config, transport, registry);
        let intake = Rc::new(RefCell::new(IntakeController::new()));

        // Registered first so later subscribers see the emptied queue.
        let queue = Rc::clone(&intake);
        orchestrator.subscribe(move |state| {
            if let SubmissionState::Succeeded(_) = state {
                queue.borrow_mut().clear();
            }
        });

        Self { intake, orchestrator }
    }

    pub fn orchestrator(&self) -> &SubmissionOrchestrator<T, R> {
        &self.orchestrator
    }

    pub fn state(&self) -> SubmissionState {
        self.orchestrator.state()
    }

    /// Copy of the intake lists.
    pub fn intake(&self) -> IntakeController {
        self.intake.borrow().snapshot()
    }

    pub fn screen(&self) -> Screen {
        present(&self.orchestrator.state(), &self.intake.borrow())
    }

    pub fn subscribe(&self, listener: impl Fn(&SubmissionState) + 'static) {
        self.orchestrator.subscribe(listener);
    }

    /// Filter and queue dropped files. The queue is frozen while submitting.
    pub fn drop_files(&self, candidates: Vec<CandidateFile>) -> bool {
        if self.orchestrator.state().is_submitting() {
            log::debug!("Drop ignored while a conversion is running");
            return false;
        }
        self.intake.borrow_mut().drop_files(candidates);
        true
    }

    pub fn remove_file(&self, name: &str) -> bool {
        if self.orchestrator.state().is_submitting() {
            return false;
        }
        self.intake.borrow_mut().remove_file(name);
        true
    }

    /// Submit whatever is queued right now.
    pub async fn submit(&self) -> SubmitOutcome {
        let files = self.intake.borrow().queue().to_vec();
        self.orchestrator.submit(&files).await
    }

    /// Back to the empty intake screen. Refused while submitting.
    pub fn go_home(&self) -> bool {
        if self.orchestrator.state().is_submitting() || self.orchestrator.is_disposed() {
            return false;
        }
        self.intake.borrow_mut().clear();
        self.orchestrator.reset()
    }

    pub fn dispose(&self) {
        self.orchestrator.dispose();
    }
}
