//! Storage backend contract and the in-memory reference backend
//!
//! [`AttachmentStorage`] is the seam between the data bus facade and a
//! concrete backend. Any backend implementing it is substitutable: the
//! facade stays backend-agnostic, and because timestamp/length injection
//! lives here rather than in the facade, every backend yields the same
//! provenance metadata that downstream policy (retention, auditing) can
//! rely on uniformly.
//!
//! Backends implemented so far:
//!
//! - **Memory**: [`InMemStorage`] over an [`InMemDataStore`], for tests and
//!   short-lived processes.
//!
//! A persistent backend (files, blobs, a database) implements the same trait
//! in its own crate. Such a backend may stream instead of fully buffering on
//! save, as long as readers never observe an id as present with incomplete
//! content.

use std::io::{Cursor, Read, Seek};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::clock::{format_timestamp, Clock, SystemClock};
use crate::error::Result;
use crate::metadata::{keys, Metadata};
use crate::store::InMemDataStore;

/// Byte stream handed out by [`AttachmentStorage::read`].
///
/// Every `read` call yields a freshly materialized, independently seekable
/// reader. Concurrent readers of the same attachment never share position
/// state or backing buffers.
pub type AttachmentReader = Box<dyn AttachmentRead + Send>;

/// `Read + Seek`, boxable. Blanket-implemented; backends return whatever
/// concrete reader suits them.
pub trait AttachmentRead: Read + Seek {}

impl<T: Read + Seek + ?Sized> AttachmentRead for T {}

impl std::fmt::Debug for dyn AttachmentRead + Send {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AttachmentRead")
    }
}

/// Standardized save/read/read-metadata contract for attachment backends.
pub trait AttachmentStorage: Send + Sync {
    /// Drain `source` to completion and persist it under `id`.
    ///
    /// The persisted metadata is a defensive copy of the caller's map (empty
    /// if `None`) plus the reserved keys [`keys::SAVE_TIME`] and
    /// [`keys::LENGTH`]. Reserved keys overwrite caller-supplied values under
    /// the same name. Closing/disposing `source` afterwards remains the
    /// caller's responsibility.
    fn save(&self, id: &str, source: &mut dyn Read, metadata: Option<&Metadata>) -> Result<()>;

    /// Open the content saved under `id`.
    ///
    /// Stamps [`keys::READ_TIME`] into the attachment's metadata before the
    /// reader is returned. Fails with `NotFound` for an unknown id.
    fn read(&self, id: &str) -> Result<AttachmentReader>;

    /// Snapshot of the metadata saved under `id`.
    fn read_metadata(&self, id: &str) -> Result<Metadata>;
}

/// In-memory reference backend.
///
/// Fully buffers the source on save (so the exact length is known before the
/// entry becomes visible) and serves reads as isolated cursors over a copy of
/// the content.
pub struct InMemStorage {
    store: InMemDataStore,
    clock: Arc<dyn Clock>,
}

impl InMemStorage {
    /// Create a backend over `store`, stamping timestamps from the wall clock.
    pub fn new(store: InMemDataStore) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Create a backend over `store` with an explicit clock (e.g. a
    /// [`FixedClock`](crate::clock::FixedClock) in tests).
    pub fn with_clock(store: InMemDataStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// The underlying store, for test inspection.
    pub fn store(&self) -> &InMemDataStore {
        &self.store
    }
}

impl AttachmentStorage for InMemStorage {
    fn save(&self, id: &str, source: &mut dyn Read, metadata: Option<&Metadata>) -> Result<()> {
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes)?;

        let mut metadata_to_write = metadata.cloned().unwrap_or_default();
        for &key in keys::RESERVED {
            if metadata_to_write.contains_key(key) {
                warn!(id, key, "caller metadata uses a reserved key, overwriting");
            }
        }
        metadata_to_write.insert(
            keys::SAVE_TIME.to_owned(),
            format_timestamp(self.clock.now()),
        );
        metadata_to_write.insert(keys::LENGTH.to_owned(), bytes.len().to_string());

        debug!(id, length = bytes.len(), "saving attachment");
        self.store.save(id, bytes, metadata_to_write);
        Ok(())
    }

    fn read(&self, id: &str) -> Result<AttachmentReader> {
        let mut read_stamp = Metadata::new();
        read_stamp.insert(
            keys::READ_TIME.to_owned(),
            format_timestamp(self.clock.now()),
        );
        // Stamping first also surfaces NotFound before any content is copied.
        self.store.add_metadata(id, read_stamp)?;

        let bytes = self.store.load(id)?;
        debug!(id, length = bytes.len(), "reading attachment");
        Ok(Box::new(Cursor::new(bytes)))
    }

    fn read_metadata(&self, id: &str) -> Result<Metadata> {
        self.store.load_metadata(id)
    }
}
