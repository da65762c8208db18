//! Error types for attachment storage

use thiserror::Error;

/// Result type for data bus and storage operations
pub type Result<T> = std::result::Result<T, DataBusError>;

/// Errors that can occur when creating or resolving attachments.
///
/// Errors are surfaced to the immediate caller and never retried or swallowed
/// inside this crate. A `NotFound` raised by the store propagates unchanged
/// through the backend and facade layers.
#[derive(Debug, Error)]
pub enum DataBusError {
    /// No attachment with the given id exists in the resolved backend
    #[error("attachment not found: {0}")]
    NotFound(String),

    /// Draining the caller-supplied source stream failed
    #[error("failed to read attachment source: {0}")]
    Io(#[from] std::io::Error),
}
