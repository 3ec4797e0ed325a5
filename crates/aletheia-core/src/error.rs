//! Error types for audit event construction and writing.

use thiserror::Error;

/// Errors that can occur while building an audit event.
#[derive(Debug, Error)]
pub enum EventError {
    /// A required event field is empty.
    #[error("required audit event field is empty: {field}")]
    MissingField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The supplied `data` payload is not well-formed JSON.
    #[error("audit event data is not valid JSON: {0}")]
    InvalidData(#[source] serde_json::Error),
}

/// Errors that can occur while encoding or writing an audit event.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The event failed validation before encoding.
    #[error(transparent)]
    Event(#[from] EventError),

    /// The event could not be serialized.
    #[error("failed to encode audit event: {0}")]
    Encode(#[from] serde_json::Error),

    /// The sink rejected the write.
    #[error("failed to write audit event: {0}")]
    Io(#[from] std::io::Error),
}
