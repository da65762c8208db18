//! Attachment metadata and the reserved key contract

use std::collections::HashMap;

/// Metadata attached to a stored payload.
///
/// Keys are unique; the mapping only ever grows over an attachment's life
/// (augmented on save and on every read), it never shrinks.
pub type Metadata = HashMap<String, String>;

/// Reserved metadata keys managed by storage backends.
///
/// Backends write these on save and read. A caller-supplied value under one of
/// these keys is overwritten by the system value (see
/// [`keys::RESERVED`] and the collision warning in the reference backend).
pub mod keys {
    /// When the attachment was saved, ISO-8601 with offset.
    pub const SAVE_TIME: &str = "save-timestamp";

    /// Payload length in bytes, as a decimal string.
    pub const LENGTH: &str = "length";

    /// When the attachment was last read, ISO-8601 with offset.
    pub const READ_TIME: &str = "read-timestamp";

    /// All keys a backend may overwrite.
    pub const RESERVED: &[&str] = &[SAVE_TIME, LENGTH, READ_TIME];
}
