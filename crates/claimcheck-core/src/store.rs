//! In-memory attachment data store
//!
//! A HashMap-backed keyed blob repository with attached metadata. Holds no
//! business logic: timestamp/length injection lives in the backend layered on
//! top ([`crate::storage::InMemStorage`]). Not suitable for production use
//! due to lack of persistence; entries live until the store is discarded.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{DataBusError, Result};
use crate::metadata::Metadata;

#[derive(Debug)]
struct StoredEntry {
    content: Vec<u8>,
    metadata: Metadata,
}

/// In-memory blob store keyed by attachment id.
///
/// Cloning is cheap and clones share the same underlying map, so a single
/// store can back several backends at once (e.g. every facade in a test suite
/// seeing the same data). The internal map is guarded by a coarse mutex;
/// concurrent save/load/merge from multiple threads is safe.
#[derive(Debug, Clone, Default)]
pub struct InMemDataStore {
    entries: Arc<Mutex<HashMap<String, StoredEntry>>>,
}

impl InMemDataStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `id`.
    ///
    /// No uniqueness check: the facade guarantees id uniqueness by generation,
    /// so replacing an existing id silently overwrites prior content and
    /// metadata.
    pub fn save(&self, id: &str, bytes: Vec<u8>, metadata: Metadata) {
        let mut entries = self.entries.lock();
        entries.insert(
            id.to_owned(),
            StoredEntry {
                content: bytes,
                metadata,
            },
        );
    }

    /// Load the content for `id`.
    pub fn load(&self, id: &str) -> Result<Vec<u8>> {
        let entries = self.entries.lock();
        entries
            .get(id)
            .map(|entry| entry.content.clone())
            .ok_or_else(|| DataBusError::NotFound(id.to_owned()))
    }

    /// Load a snapshot of the metadata for `id`.
    ///
    /// Returns a copy, never a live view, so callers cannot mutate stored
    /// metadata outside the defined augmentation paths.
    pub fn load_metadata(&self, id: &str) -> Result<Metadata> {
        let entries = self.entries.lock();
        entries
            .get(id)
            .map(|entry| entry.metadata.clone())
            .ok_or_else(|| DataBusError::NotFound(id.to_owned()))
    }

    /// Merge `additional` into the metadata for `id`, last-write-wins per key.
    pub fn add_metadata(&self, id: &str, additional: Metadata) -> Result<()> {
        let mut entries = self.entries.lock();
        let entry = entries
            .get_mut(id)
            .ok_or_else(|| DataBusError::NotFound(id.to_owned()))?;
        entry.metadata.extend(additional);
        Ok(())
    }

    /// Whether an entry for `id` exists.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.lock().contains_key(id)
    }

    /// Number of stored attachments.
    pub fn count(&self) -> usize {
        self.entries.lock().len()
    }

    /// Ids of all stored attachments, in no particular order.
    pub fn attachment_ids(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }

    /// Remove all entries.
    pub fn reset(&self) {
        self.entries.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn meta(pairs: &[(&str, &str)]) -> Metadata {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn save_and_load_roundtrip() {
        let store = InMemDataStore::new();
        store.save("id-1", b"payload".to_vec(), meta(&[("author", "alice")]));

        assert_eq!(store.load("id-1").unwrap(), b"payload");
        assert_eq!(
            store.load_metadata("id-1").unwrap(),
            meta(&[("author", "alice")])
        );
    }

    #[test]
    fn load_unknown_id_is_not_found() {
        let store = InMemDataStore::new();
        assert!(matches!(
            store.load("missing"),
            Err(DataBusError::NotFound(id)) if id == "missing"
        ));
        assert!(matches!(
            store.load_metadata("missing"),
            Err(DataBusError::NotFound(_))
        ));
        assert!(matches!(
            store.add_metadata("missing", Metadata::new()),
            Err(DataBusError::NotFound(_))
        ));
    }

    #[test]
    fn save_replaces_existing_entry() {
        let store = InMemDataStore::new();
        store.save("id-1", b"first".to_vec(), meta(&[("v", "1")]));
        store.save("id-1", b"second".to_vec(), meta(&[("v", "2")]));

        assert_eq!(store.load("id-1").unwrap(), b"second");
        assert_eq!(store.load_metadata("id-1").unwrap(), meta(&[("v", "2")]));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn add_metadata_merges_last_write_wins() {
        let store = InMemDataStore::new();
        store.save("id-1", Vec::new(), meta(&[("a", "1"), ("b", "1")]));

        store
            .add_metadata("id-1", meta(&[("b", "2"), ("c", "2")]))
            .unwrap();

        assert_eq!(
            store.load_metadata("id-1").unwrap(),
            meta(&[("a", "1"), ("b", "2"), ("c", "2")])
        );
    }

    #[test]
    fn load_metadata_returns_snapshot() {
        let store = InMemDataStore::new();
        store.save("id-1", Vec::new(), meta(&[("a", "1")]));

        let mut snapshot = store.load_metadata("id-1").unwrap();
        snapshot.insert("sneaky".into(), "edit".into());

        // The stored mapping is unaffected by mutating the snapshot.
        assert_eq!(store.load_metadata("id-1").unwrap(), meta(&[("a", "1")]));
    }

    #[test]
    fn clones_share_the_same_entries() {
        let store = InMemDataStore::new();
        let view = store.clone();

        store.save("id-1", b"shared".to_vec(), Metadata::new());

        assert!(view.contains("id-1"));
        assert_eq!(view.load("id-1").unwrap(), b"shared");
    }

    #[test]
    fn inspection_helpers() {
        let store = InMemDataStore::new();
        store.save("id-1", Vec::new(), Metadata::new());
        store.save("id-2", Vec::new(), Metadata::new());

        assert_eq!(store.count(), 2);
        let mut ids = store.attachment_ids();
        ids.sort();
        assert_eq!(ids, vec!["id-1", "id-2"]);

        store.reset();
        assert_eq!(store.count(), 0);
        assert!(!store.contains("id-1"));
    }

    #[test]
    fn concurrent_saves_and_merges_do_not_corrupt() {
        let store = InMemDataStore::new();
        store.save("id-1", Vec::new(), Metadata::new());

        let handles: Vec<_> = (0..8)
            .map(|n| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        let mut extra = Metadata::new();
                        extra.insert(format!("thread-{n}"), i.to_string());
                        store.add_metadata("id-1", extra).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let metadata = store.load_metadata("id-1").unwrap();
        assert_eq!(metadata.len(), 8);
        for n in 0..8 {
            assert_eq!(metadata[&format!("thread-{n}")], "99");
        }
    }
}
