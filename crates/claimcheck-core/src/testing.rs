//! Ambient test-mode backend switch
//!
//! Test harnesses layered over production code paths often cannot thread an
//! explicit backend through to every [`DataBus`](crate::bus::DataBus)
//! construction site. [`TestBackdoor`] holds a single process-wide backend
//! slot that the facade consults when it was not given an explicit backend.
//!
//! The slot is meant to be installed in test setup and cleared in teardown
//! (see `claimcheck-testing` for an RAII guard that pairs the two). Concurrent
//! installs from unrelated tests are a caller-discipline concern; the slot
//! itself only guarantees atomic replace/clear, so a reader never observes a
//! backend mid-construction.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::storage::AttachmentStorage;

static AMBIENT_STORAGE: RwLock<Option<Arc<dyn AttachmentStorage>>> = RwLock::new(None);

/// Process-wide enable/disable of a designated attachment backend.
///
/// Two states: disabled (initial, and after [`reset`](TestBackdoor::reset))
/// and enabled. There is no nesting; enabling while already enabled replaces
/// the previous backend.
pub struct TestBackdoor;

impl TestBackdoor {
    /// Install `storage` as the ambient backend, replacing any previous one.
    pub fn enable(storage: Arc<dyn AttachmentStorage>) {
        debug!("enabling ambient attachment backend");
        *AMBIENT_STORAGE.write() = Some(storage);
    }

    /// The active ambient backend, if one is installed.
    pub fn current() -> Option<Arc<dyn AttachmentStorage>> {
        AMBIENT_STORAGE.read().clone()
    }

    /// Clear the ambient backend. Idempotent; a no-op when nothing is
    /// installed.
    pub fn reset() {
        debug!("resetting ambient attachment backend");
        *AMBIENT_STORAGE.write() = None;
    }
}
