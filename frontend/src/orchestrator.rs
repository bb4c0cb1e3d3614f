//! Submission Orchestrator - the `Idle → Submitting → Succeeded/Failed` machine.
//!
//! ```text
//! Idle ──submit()──▶ Submitting ──200──────▶ Succeeded(resource)
//!                         │
//!                         └──other/error──▶ Failed(error)
//! Succeeded / Failed ──reset()──▶ Idle
//! ```
//!
//! The orchestrator is single-threaded and cheaply cloneable: clones share
//! one state. A submission is one task; while it is in flight every other
//! `submit()` is ignored. Errors are folded into [`SubmissionState::Failed`],
//! so callers never handle a `Result`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::{ConvertConfig, XLSX_MIME};
use crate::error::{SubmitError, SubmitResult};
use crate::intake::QueuedFile;
use crate::services::{DownloadableResource, HttpResponse, MultipartPart, ResourceHandle, ResourceRegistry, Transport};

/// HTTP status the conversion server answers with on success.
const STATUS_OK: u16 = 200;

// =============================================================================
// State
// =============================================================================

/// The one state every presentation decision derives from.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded(DownloadableResource),
    Failed(SubmitError),
}

impl SubmissionState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionState::Submitting)
    }

    pub fn resource(&self) -> Option<&DownloadableResource> {
        match self {
            SubmissionState::Succeeded(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&SubmitError> {
        match self {
            SubmissionState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// What a call to [`SubmissionOrchestrator::submit`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was sent.
    Ignored(IgnoreReason),
    Succeeded,
    Failed,
    /// The orchestrator was disposed while the request was in flight.
    Discarded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    EmptyQueue,
    AlreadySubmitting,
    Disposed,
}

type Listener = Rc<dyn Fn(&SubmissionState)>;

// =============================================================================
// Orchestrator
// =============================================================================

struct Inner<T, R: ResourceRegistry> {
    config: ConvertConfig,
    transport: T,
    registry: R,
    state: RefCell<SubmissionState>,
    /// Handle issued by `registry` and not yet revoked.
    live: RefCell<Option<ResourceHandle>>,
    disposed: Cell<bool>,
    listeners: RefCell<Vec<Listener>>,
}

impl<T, R: ResourceRegistry> Inner<T, R> {
    fn release_live(&self) {
        if let Some(handle) = self.live.borrow_mut().take() {
            self.registry.revoke(&handle);
        }
    }
}

impl<T, R: ResourceRegistry> Drop for Inner<T, R> {
    fn drop(&mut self) {
        self.release_live();
    }
}

/// Drives one submission at a time and owns the download handle.
pub struct SubmissionOrchestrator<T, R: ResourceRegistry> {
    inner: Rc<Inner<T, R>>,
}

impl<T, R: ResourceRegistry> Clone for SubmissionOrchestrator<T, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Transport, R: ResourceRegistry> SubmissionOrchestrator<T, R> {
    pub fn new(config: ConvertConfig, transport: T, registry: R) -> Self {
        Self {
            inner: Rc::new(Inner {
                config,
                transport,
                registry,
                state: RefCell::new(SubmissionState::Idle),
                live: RefCell::new(None),
                disposed: Cell::new(false),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.inner.state.borrow().clone()
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.inner.config
    }

    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    pub fn registry(&self) -> &R {
        &self.inner.registry
    }

    /// Handle of the converted file currently exposed, if any.
    pub fn live_handle(&self) -> Option<ResourceHandle> {
        self.inner.live.borrow().clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    /// Register a callback run after every transition, in registration order.
    ///
    /// Listeners may read the orchestrator but must not subscribe from
    /// inside the callback.
    pub fn subscribe(&self, listener: impl Fn(&SubmissionState) + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Send the queued files to the conversion endpoint.
    ///
    /// `Submitting` is published before the request leaves. The future
    /// resolves once the state is terminal (or the result was discarded).
    pub async fn submit(&self, files: &[QueuedFile]) -> SubmitOutcome {
        if self.inner.disposed.get() {
            return SubmitOutcome::Ignored(IgnoreReason::Disposed);
        }
        let Some(first) = files.first() else {
            return SubmitOutcome::Ignored(IgnoreReason::EmptyQueue);
        };
        if self.inner.state.borrow().is_submitting() {
            log::warn!("⏳ Submission already in flight, ignoring {}", first.name);
            return SubmitOutcome::Ignored(IgnoreReason::AlreadySubmitting);
        }

        let file_name = first.name.clone();
        let parts: Vec<MultipartPart> = files.iter().map(MultipartPart::from_queued).collect();
        let url = self.inner.config.upload_url();

        // Leaving Succeeded supersedes the previous download.
        self.inner.release_live();
        self.transition(SubmissionState::Submitting);
        log::info!("📤 Uploading {} to {}", file_name, url);

        let result = self.inner.transport.post_multipart(&url, &parts).await;

        if self.inner.disposed.get() {
            log::warn!("🚫 Orchestrator disposed mid-flight, dropping result for {}", file_name);
            return SubmitOutcome::Discarded;
        }

        match result.and_then(|response| self.expose(response, file_name)) {
            Ok(resource) => {
                log::info!("✅ Converted {} ({} bytes)", resource.file_name, resource.size);
                *self.inner.live.borrow_mut() = Some(resource.handle.clone());
                self.transition(SubmissionState::Succeeded(resource));
                SubmitOutcome::Succeeded
            }
            Err(error) => {
                log::error!("❌ Conversion failed: {}", error);
                self.transition(SubmissionState::Failed(error));
                SubmitOutcome::Failed
            }
        }
    }

    /// Return to `Idle`, releasing the download handle.
    ///
    /// Refused while a submission is in flight.
    pub fn reset(&self) -> bool {
        if self.inner.disposed.get() || self.inner.state.borrow().is_submitting() {
            return false;
        }
        self.inner.release_live();
        self.transition(SubmissionState::Idle);
        true
    }

    /// Tear down: release the handle and stop publishing transitions.
    ///
    /// An in-flight request still runs to completion; its result is dropped.
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        self.inner.release_live();
        self.inner.listeners.borrow_mut().clear();
        *self.inner.state.borrow_mut() = SubmissionState::Idle;
        log::debug!("🧹 Submission orchestrator disposed");
    }

    fn expose(&self, response: HttpResponse, file_name: String) -> SubmitResult<DownloadableResource> {
        if response.status != STATUS_OK {
            return Err(SubmitError::status(response.status, &response.body));
        }

        let mime = response
            .content_type
            .filter(|ct| !ct.is_empty())
            .unwrap_or_else(|| XLSX_MIME.to_string());
        let handle = self.inner.registry.create(&response.body, &mime)?;

        Ok(DownloadableResource {
            handle,
            file_name,
            mime,
            size: response.body.len(),
        })
    }

    fn transition(&self, next: SubmissionState) {
        *self.inner.state.borrow_mut() = next.clone();
        let listeners: Vec<Listener> = self.inner.listeners.borrow().clone();
        for listener in listeners {
            listener(&next);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::XLSX_MIME;
    use crate::intake::CandidateFile;
    use crate::services::MemoryRegistry;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use futures::FutureExt;

    /// Transport answering from a script, optionally held until a gate opens.
    #[derive(Default)]
    pub(crate) struct StubTransport {
        response: RefCell<Option<SubmitResult<HttpResponse>>>,
        gate: RefCell<Option<oneshot::Receiver<()>>>,
        requests: RefCell<Vec<(String, Vec<MultipartPart>)>>,
    }

    impl StubTransport {
        pub(crate) fn answering(response: SubmitResult<HttpResponse>) -> Self {
            Self {
                response: RefCell::new(Some(response)),
                ..Default::default()
            }
        }

        pub(crate) fn gated(response: SubmitResult<HttpResponse>, gate: oneshot::Receiver<()>) -> Self {
            let stub = Self::answering(response);
            *stub.gate.borrow_mut() = Some(gate);
            stub
        }

        pub(crate) fn calls(&self) -> usize {
            self.requests.borrow().len()
        }

        pub(crate) fn set_response(&self, response: SubmitResult<HttpResponse>) {
            *self.response.borrow_mut() = Some(response);
        }
    }

    impl Transport for StubTransport {
        async fn post_multipart(&self, url: &str, parts: &[MultipartPart]) -> SubmitResult<HttpResponse> {
            self.requests.borrow_mut().push((url.to_string(), parts.to_vec()));
            let gate = self.gate.borrow_mut().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            self.response
                .borrow_mut()
                .take()
                .unwrap_or_else(|| Err(SubmitError::Network("no scripted response".into())))
        }
    }

    pub(crate) const CONVERTED: &[u8] = b"PK\x03\x04converted-workbook";

    pub(crate) fn report() -> QueuedFile {
        QueuedFile::from(CandidateFile::from_bytes("report.xlsx", XLSX_MIME, b"PK\x03\x04original".to_vec()))
    }

    fn orchestrator(transport: StubTransport) -> SubmissionOrchestrator<StubTransport, MemoryRegistry> {
        SubmissionOrchestrator::new(ConvertConfig::new("http://stub.test"), transport, MemoryRegistry::new())
    }

    fn record(orch: &SubmissionOrchestrator<StubTransport, MemoryRegistry>) -> Rc<RefCell<Vec<SubmissionState>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        orch.subscribe(move |state| sink.borrow_mut().push(state.clone()));
        seen
    }

    #[test]
    fn test_success_exposes_exact_bytes() {
        let orch = orchestrator(StubTransport::answering(Ok(HttpResponse::new(200, CONVERTED))));
        let outcome = block_on(orch.submit(&[report()]));

        assert_eq!(outcome, SubmitOutcome::Succeeded);
        let state = orch.state();
        let resource = state.resource().expect("succeeded");
        assert_eq!(resource.file_name, "report.xlsx");
        assert_eq!(resource.mime, XLSX_MIME);
        assert_eq!(resource.size, CONVERTED.len());
        assert_eq!(orch.registry().read(&resource.handle).unwrap(), CONVERTED);
        assert_eq!(orch.live_handle().as_ref(), Some(&resource.handle));
    }

    #[test]
    fn test_request_shape() {
        let orch = orchestrator(StubTransport::answering(Ok(HttpResponse::new(200, CONVERTED))));
        block_on(orch.submit(&[report()]));

        let requests = orch.transport().requests.borrow();
        assert_eq!(requests.len(), 1);
        let (url, parts) = &requests[0];
        assert_eq!(url, "http://stub.test/uploadfile");
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].field, "file");
        assert_eq!(parts[0].file_name, "report.xlsx");
    }

    #[test]
    fn test_transitions_are_published_in_order() {
        let orch = orchestrator(StubTransport::answering(Ok(HttpResponse::new(200, CONVERTED))));
        let seen = record(&orch);
        block_on(orch.submit(&[report()]));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], SubmissionState::Submitting);
        assert!(matches!(seen[1], SubmissionState::Succeeded(_)));
    }

    #[test]
    fn test_server_error_fails_without_handle() {
        let orch = orchestrator(StubTransport::answering(Ok(HttpResponse::new(500, b"boom".to_vec()))));
        let outcome = block_on(orch.submit(&[report()]));

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(
            orch.state().error(),
            Some(&SubmitError::Status {
                status: 500,
                body: "boom".into()
            })
        );
        assert!(orch.live_handle().is_none());
        assert_eq!(orch.registry().live_count(), 0);
    }

    #[test]
    fn test_non_200_success_status_is_failure() {
        let orch = orchestrator(StubTransport::answering(Ok(HttpResponse::new(204, Vec::new()))));
        assert_eq!(block_on(orch.submit(&[report()])), SubmitOutcome::Failed);
        assert_eq!(orch.registry().live_count(), 0);
    }

    #[test]
    fn test_network_error_fails() {
        let orch = orchestrator(StubTransport::answering(Err(SubmitError::Network("connection reset".into()))));
        assert_eq!(block_on(orch.submit(&[report()])), SubmitOutcome::Failed);
        assert_eq!(
            orch.state(),
            SubmissionState::Failed(SubmitError::Network("connection reset".into()))
        );
        assert_eq!(orch.registry().live_count(), 0);
    }

    #[test]
    fn test_empty_ok_body_still_succeeds() {
        let orch = orchestrator(StubTransport::answering(Ok(HttpResponse::new(200, Vec::new()))));
        assert_eq!(block_on(orch.submit(&[report()])), SubmitOutcome::Succeeded);

        let resource = orch.state().resource().cloned().unwrap();
        assert_eq!(resource.size, 0);
        assert!(orch.registry().is_live(&resource.handle));
        assert_eq!(orch.registry().read(&resource.handle).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_empty_queue_is_noop() {
        let orch = orchestrator(StubTransport::answering(Ok(HttpResponse::new(200, CONVERTED))));
        let seen = record(&orch);

        assert_eq!(
            block_on(orch.submit(&[])),
            SubmitOutcome::Ignored(IgnoreReason::EmptyQueue)
        );
        assert_eq!(orch.state(), SubmissionState::Idle);
        assert_eq!(orch.transport().calls(), 0);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_second_submit_while_in_flight_is_ignored() {
        let (open, gate) = oneshot::channel();
        let orch = orchestrator(StubTransport::gated(Ok(HttpResponse::new(200, CONVERTED)), gate));
        let files = vec![report()];

        let mut first = Box::pin(orch.submit(&files));
        assert!(first.as_mut().now_or_never().is_none());
        assert!(orch.state().is_submitting());

        let second = orch.submit(&files).now_or_never();
        assert_eq!(second, Some(SubmitOutcome::Ignored(IgnoreReason::AlreadySubmitting)));
        assert_eq!(orch.transport().calls(), 1);

        open.send(()).unwrap();
        assert_eq!(block_on(first), SubmitOutcome::Succeeded);
        assert_eq!(orch.transport().calls(), 1);
    }

    #[test]
    fn test_retry_after_failure() {
        let orch = orchestrator(StubTransport::answering(Ok(HttpResponse::new(503, b"busy".to_vec()))));
        assert_eq!(block_on(orch.submit(&[report()])), SubmitOutcome::Failed);

        orch.transport().set_response(Ok(HttpResponse::new(200, CONVERTED)));
        assert_eq!(block_on(orch.submit(&[report()])), SubmitOutcome::Succeeded);
        assert_eq!(orch.transport().calls(), 2);
    }

    #[test]
    fn test_new_resource_supersedes_previous() {
        let orch = orchestrator(StubTransport::answering(Ok(HttpResponse::new(200, CONVERTED))));
        block_on(orch.submit(&[report()]));
        let first = orch.live_handle().unwrap();

        orch.transport().set_response(Ok(HttpResponse::new(200, b"second".to_vec())));
        block_on(orch.submit(&[report()]));
        let second = orch.live_handle().unwrap();

        assert_ne!(first, second);
        assert!(!orch.registry().is_live(&first));
        assert!(orch.registry().is_live(&second));
        assert_eq!(orch.registry().live_count(), 1);
    }

    #[test]
    fn test_reset_revokes_handle() {
        let orch = orchestrator(StubTransport::answering(Ok(HttpResponse::new(200, CONVERTED))));
        block_on(orch.submit(&[report()]));
        let handle = orch.live_handle().unwrap();

        assert!(orch.reset());
        assert_eq!(orch.state(), SubmissionState::Idle);
        assert!(!orch.registry().is_live(&handle));
        assert!(orch.registry().read(&handle).is_none());
    }

    #[test]
    fn test_reset_refused_while_submitting() {
        let (open, gate) = oneshot::channel();
        let orch = orchestrator(StubTransport::gated(Ok(HttpResponse::new(200, CONVERTED)), gate));
        let files = vec![report()];

        let mut pending = Box::pin(orch.submit(&files));
        assert!(pending.as_mut().now_or_never().is_none());
        assert!(!orch.reset());
        assert!(orch.state().is_submitting());

        open.send(()).unwrap();
        block_on(pending);
    }

    #[test]
    fn test_dispose_mid_flight_discards_result() {
        let (open, gate) = oneshot::channel();
        let orch = orchestrator(StubTransport::gated(Ok(HttpResponse::new(200, CONVERTED)), gate));
        let seen = record(&orch);
        let files = vec![report()];

        let mut pending = Box::pin(orch.submit(&files));
        assert!(pending.as_mut().now_or_never().is_none());
        orch.dispose();

        open.send(()).unwrap();
        assert_eq!(block_on(pending), SubmitOutcome::Discarded);
        assert_eq!(orch.registry().live_count(), 0);
        assert_eq!(*seen.borrow(), vec![SubmissionState::Submitting]);
        assert_eq!(
            block_on(orch.submit(&files)),
            SubmitOutcome::Ignored(IgnoreReason::Disposed)
        );
    }

    #[test]
    fn test_dispose_revokes_live_handle() {
        let orch = orchestrator(StubTransport::answering(Ok(HttpResponse::new(200, CONVERTED))));
        block_on(orch.submit(&[report()]));
        let handle = orch.live_handle().unwrap();

        orch.dispose();
        assert!(orch.is_disposed());
        assert!(!orch.registry().is_live(&handle));
        assert!(orch.live_handle().is_none());
    }

    #[test]
    fn test_drop_revokes_live_handle() {
        let registry = Rc::new(MemoryRegistry::new());
        let orch = SubmissionOrchestrator::new(
            ConvertConfig::new("http://stub.test"),
            StubTransport::answering(Ok(HttpResponse::new(200, CONVERTED))),
            Rc::clone(&registry),
        );
        block_on(orch.submit(&[report()]));
        assert_eq!(registry.live_count(), 1);

        drop(orch);
        assert_eq!(registry.live_count(), 0);
    }
}
