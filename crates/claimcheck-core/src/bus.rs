//! Data bus attachment facade
//!
//! The claim-check entry point: large payloads are written to a storage
//! backend and referenced by an opaque [`Attachment`] id carried in the
//! message instead of the payload itself.

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::metadata::Metadata;
use crate::storage::{AttachmentReader, AttachmentStorage, InMemStorage};
use crate::store::InMemDataStore;
use crate::testing::TestBackdoor;

/// Handle to one stored payload.
///
/// Wraps only the id; the content stays in the backend and is retrieved via
/// [`DataBus::open_read`]. Serializable so it can travel inside message
/// bodies in place of the payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attachment {
    id: String,
}

impl Attachment {
    /// Wrap an existing attachment id.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The opaque attachment id.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Public entry point for creating and consuming attachments.
///
/// The backend is resolved once, at construction, first match wins:
///
/// 1. an explicit backend or store passed to [`with_storage`](DataBus::with_storage)
///    or [`with_store`](DataBus::with_store),
/// 2. the ambient backend installed via [`TestBackdoor`], if any,
/// 3. a fresh private in-memory backend, isolated to this instance.
///
/// Note that [`create_attachment`](DataBus::create_attachment) and
/// [`open_read`](DataBus::open_read) both mutate backend-held metadata
/// (save-timestamp and length on create, read-timestamp on every read) even
/// though they look like pure I/O from the caller's side. This is an
/// intentional, documented effect.
pub struct DataBus {
    storage: Arc<dyn AttachmentStorage>,
}

impl DataBus {
    /// Create a bus resolving its backend from the ambient switch, falling
    /// back to a private in-memory backend.
    pub fn new() -> Self {
        let storage = TestBackdoor::current()
            .unwrap_or_else(|| Arc::new(InMemStorage::new(InMemDataStore::new())));
        Self { storage }
    }

    /// Create a bus over an explicit backend.
    pub fn with_storage(storage: Arc<dyn AttachmentStorage>) -> Self {
        Self { storage }
    }

    /// Create a bus over an in-memory backend backed by `store`.
    ///
    /// Clones of the store share data, so several buses constructed from
    /// clones of one store see the same attachments.
    pub fn with_store(store: InMemDataStore) -> Self {
        Self::with_storage(Arc::new(InMemStorage::new(store)))
    }

    /// Store the payload read from `source` and return a handle to it.
    ///
    /// Generates a fresh collision-resistant id (uuid v4 rendered as text);
    /// ids are never supplied by the caller. `source` is drained to
    /// completion; closing it afterwards is the caller's responsibility.
    pub fn create_attachment(
        &self,
        source: &mut dyn Read,
        metadata: Option<&Metadata>,
    ) -> Result<Attachment> {
        let id = Uuid::new_v4().to_string();
        self.storage.save(&id, source, metadata)?;
        debug!(id = %id, "created attachment");
        Ok(Attachment::new(id))
    }

    /// Open the content stored under `id`.
    pub fn open_read(&self, id: &str) -> Result<AttachmentReader> {
        self.storage.read(id)
    }

    /// Snapshot of the metadata stored under `id`.
    pub fn get_metadata(&self, id: &str) -> Result<Metadata> {
        self.storage.read_metadata(id)
    }
}

impl Default for DataBus {
    fn default() -> Self {
        Self::new()
    }
}
