//! Claimcheck test helpers
//!
//! Fakes the presence of a configured data bus for code under test.
//! [`establish_context`] installs an in-memory backend into the process-wide
//! ambient switch and returns a guard that uninstalls it on drop, so every
//! [`DataBus`](claimcheck_core::DataBus) constructed inside the scope without
//! an explicit backend resolves to the given store:
//!
//! ```rust
//! use claimcheck_core::{DataBus, InMemDataStore};
//! use claimcheck_testing::establish_context;
//!
//! let store = InMemDataStore::new();
//! {
//!     let _context = establish_context(store.clone());
//!
//!     // Application code constructing its own bus sees the store above.
//!     let bus = DataBus::new();
//!     let attachment = bus.create_attachment(&mut &b"payload"[..], None).unwrap();
//!     assert!(store.contains(attachment.id()));
//! }
//! // Context dropped: subsequent buses fall back to private backends.
//! ```

use std::sync::Arc;

use tracing::debug;

use claimcheck_core::testing::TestBackdoor;
use claimcheck_core::{InMemDataStore, InMemStorage};

/// Guard for an established ambient data bus context.
///
/// Clears the ambient backend when dropped, so the fake never leaks into
/// later tests or production code paths.
#[must_use = "the ambient context is cleared when this guard is dropped"]
#[derive(Debug)]
pub struct AmbientContext {
    _private: (),
}

impl Drop for AmbientContext {
    fn drop(&mut self) {
        debug!("clearing ambient data bus context");
        TestBackdoor::reset();
    }
}

/// Establish a fake ambient data bus backed by `store`.
///
/// Pass a clone of the store to share it with assertions in the test body, or
/// with other backends that should see the same attachments. Replaces any
/// previously established context; contexts do not nest.
pub fn establish_context(store: InMemDataStore) -> AmbientContext {
    TestBackdoor::enable(Arc::new(InMemStorage::new(store)));
    AmbientContext { _private: () }
}
