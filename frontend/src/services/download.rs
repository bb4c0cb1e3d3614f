//! Lifecycle of the converted workbook exposed for download.
//!
//! A successful conversion is turned into a locally resolvable handle
//! (an object URL in the browser). At most one handle is live per
//! orchestrator; the orchestrator revokes it when it is superseded, on
//! reset and on teardown.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use js_sys::{Array, Uint8Array};
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, Url};

use crate::error::{SubmitError, SubmitResult};

/// Opaque, page-local reference to a binary blob.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceHandle(String);

impl ResourceHandle {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// URL usable as an anchor `href`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The converted file, ready to be downloaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadableResource {
    pub handle: ResourceHandle,
    /// Suggested file name for the `download` attribute.
    pub file_name: String,
    pub mime: String,
    pub size: usize,
}

/// Creates and releases resource handles.
pub trait ResourceRegistry {
    fn create(&self, bytes: &[u8], mime: &str) -> SubmitResult<ResourceHandle>;

    /// Release a handle. Unknown or already revoked handles are ignored.
    fn revoke(&self, handle: &ResourceHandle);

    fn is_live(&self, handle: &ResourceHandle) -> bool;
}

impl<R: ResourceRegistry + ?Sized> ResourceRegistry for Rc<R> {
    fn create(&self, bytes: &[u8], mime: &str) -> SubmitResult<ResourceHandle> {
        (**self).create(bytes, mime)
    }

    fn revoke(&self, handle: &ResourceHandle) {
        (**self).revoke(handle)
    }

    fn is_live(&self, handle: &ResourceHandle) -> bool {
        (**self).is_live(handle)
    }
}

/// Wrap bytes into a typed `Blob`.
pub(crate) fn bytes_to_blob(bytes: &[u8], mime: &str) -> Result<Blob, JsValue> {
    let parts = Array::of1(&Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
}

// =============================================================================
// Browser Registry
// =============================================================================

/// `URL.createObjectURL` / `URL.revokeObjectURL` backed registry.
#[derive(Debug, Default)]
pub struct ObjectUrlRegistry {
    live: RefCell<HashSet<String>>,
}

impl ObjectUrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResourceRegistry for ObjectUrlRegistry {
    fn create(&self, bytes: &[u8], mime: &str) -> SubmitResult<ResourceHandle> {
        let blob = bytes_to_blob(bytes, mime).map_err(|e| SubmitError::Resource(format!("{:?}", e)))?;
        let url = Url::create_object_url_with_blob(&blob).map_err(|e| SubmitError::Resource(format!("{:?}", e)))?;
        self.live.borrow_mut().insert(url.clone());
        log::debug!("🔗 Created object URL {}", url);
        Ok(ResourceHandle(url))
    }

    fn revoke(&self, handle: &ResourceHandle) {
        if self.live.borrow_mut().remove(&handle.0) {
            if let Err(e) = Url::revoke_object_url(&handle.0) {
                log::warn!("Could not revoke {}: {:?}", handle.0, e);
            } else {
                log::debug!("🧹 Revoked object URL {}", handle.0);
            }
        }
    }

    fn is_live(&self, handle: &ResourceHandle) -> bool {
        self.live.borrow().contains(&handle.0)
    }
}

// =============================================================================
// In-memory Registry
// =============================================================================

/// Registry keeping blobs in process memory.
///
/// Handles look like `blob:memory/<n>` and can be read back with [`MemoryRegistry::read`].
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    blobs: RefCell<HashMap<String, Rc<[u8]>>>,
    next_id: Cell<u64>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes behind a live handle.
    pub fn read(&self, handle: &ResourceHandle) -> Option<Vec<u8>> {
        self.blobs.borrow().get(&handle.0).map(|bytes| bytes.to_vec())
    }

    pub fn live_count(&self) -> usize {
        self.blobs.borrow().len()
    }
}

impl ResourceRegistry for MemoryRegistry {
    fn create(&self, bytes: &[u8], _mime: &str) -> SubmitResult<ResourceHandle> {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let url = format!("blob:memory/{}", id);
        self.blobs.borrow_mut().insert(url.clone(), Rc::from(bytes));
        Ok(ResourceHandle(url))
    }

    fn revoke(&self, handle: &ResourceHandle) {
        self.blobs.borrow_mut().remove(&handle.0);
    }

    fn is_live(&self, handle: &ResourceHandle) -> bool {
        self.blobs.borrow().contains_key(&handle.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_registry_round_trip() {
        let registry = MemoryRegistry::new();
        let handle = registry.create(b"PK\x03\x04", "application/zip").unwrap();

        assert!(handle.as_str().starts_with("blob:memory/"));
        assert!(registry.is_live(&handle));
        assert_eq!(registry.read(&handle).unwrap(), b"PK\x03\x04");
    }

    #[test]
    fn test_memory_registry_revoke() {
        let registry = MemoryRegistry::new();
        let first = registry.create(b"one", "").unwrap();
        let second = registry.create(b"two", "").unwrap();
        assert_ne!(first, second);

        registry.revoke(&first);
        registry.revoke(&first);

        assert!(!registry.is_live(&first));
        assert!(registry.read(&first).is_none());
        assert!(registry.is_live(&second));
        assert_eq!(registry.live_count(), 1);
    }
}
