//! Channel acquisition and tailing for Aletheia audit log destinations.
//!
//! An audit log destination is an append-only regular file or a named pipe,
//! frequently created out-of-band by the collector that consumes it (e.g.
//! an init container running `aletheia init`). A producer must not
//! crash-loop while that collector is still coming up, and must not hang
//! forever once it is asked to shut down. This crate provides:
//!
//! - [`acquire`] / [`acquire_cancellable`] - blocking-with-retry append-only
//!   opens of the destination
//! - [`open_or_create`] - one-shot open that creates the file if missing
//! - [`create_named_pipe`] - idempotent FIFO creation
//! - [`FileTailer`] - a cooperative polling loop that drains a destination
//!   into an output stream
//!
//! Cancellation is threaded through everything as a
//! [`tokio_util::sync::CancellationToken`] and is observed within one
//! backoff interval.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod acquire;
mod error;
mod fifo;
mod tail;

pub use acquire::{acquire, acquire_cancellable, open_or_create, RETRY_INTERVAL};
pub use error::SinkError;
pub use fifo::create_named_pipe;
pub use tail::{FileTailer, TAIL_POLL_INTERVAL};

/// Audit log destinations are owner/group readable only.
pub(crate) const OWNER_GROUP_ACCESS: u32 = 0o640;
