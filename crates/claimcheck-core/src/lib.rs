//! Claimcheck core
//!
//! Claim-check attachment storage for a message bus: large payloads are not
//! sent inline with messages but written to a storage backend and referenced
//! by an opaque attachment id carried in the message.
//!
//! This crate provides the [`DataBus`] facade (create, open-for-read,
//! get-metadata), the [`AttachmentStorage`] contract any backend implements,
//! an in-memory reference backend for deterministic testing, and the
//! [`testing::TestBackdoor`] ambient switch that lets test harnesses swap in
//! a backend without rewiring application code.
//!
//! # Example
//!
//! ```rust
//! use claimcheck_core::{DataBus, InMemDataStore, Metadata};
//! use std::io::Read;
//!
//! let bus = DataBus::with_store(InMemDataStore::new());
//!
//! let mut metadata = Metadata::new();
//! metadata.insert("author".into(), "alice".into());
//!
//! let attachment = bus
//!     .create_attachment(&mut &b"hello"[..], Some(&metadata))
//!     .unwrap();
//!
//! // The handle carries only the id; fetch the content through the bus.
//! let mut content = Vec::new();
//! bus.open_read(attachment.id())
//!     .unwrap()
//!     .read_to_end(&mut content)
//!     .unwrap();
//! assert_eq!(content, b"hello");
//!
//! let saved = bus.get_metadata(attachment.id()).unwrap();
//! assert_eq!(saved["length"], "5");
//! ```

pub mod bus;
pub mod clock;
pub mod error;
pub mod metadata;
pub mod storage;
pub mod store;
pub mod testing;

// Re-export main types at crate root
pub use bus::{Attachment, DataBus};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{DataBusError, Result};
pub use metadata::{keys, Metadata};
pub use storage::{AttachmentRead, AttachmentReader, AttachmentStorage, InMemStorage};
pub use store::InMemDataStore;
