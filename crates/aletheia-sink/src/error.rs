//! Error types for destination acquisition and tailing.

use thiserror::Error;

/// Errors that can occur while acquiring or draining an audit log
/// destination.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The operation was cancelled before it could complete.
    #[error("audit log operation cancelled")]
    Cancelled,

    /// The destination could not be opened for a non-transient reason,
    /// e.g. permissions or an invalid path. Not being able to write audit
    /// events is fatal; this is never retried.
    #[error("failed to open audit log {path}: {source}")]
    Open {
        /// Destination path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The named pipe could not be created.
    #[error("failed to create named pipe {path}: {source}")]
    CreatePipe {
        /// Destination path.
        path: String,
        /// Underlying errno.
        #[source]
        source: std::io::Error,
    },

    /// An I/O error during a tail copy pass. End-of-stream is not an
    /// error and never surfaces here.
    #[error("failed to tail audit log: {0}")]
    Tail(#[from] std::io::Error),
}
