//! # Aletheia Core
//!
//! Audit event model and durable event writer for the Aletheia audit
//! pipeline.
//!
//! Correct generation of audit events aids in determining what is happening
//! in a system, doing forensic analysis on security incidents, and serving
//! as evidence in case of a breach. Events follow the shape required by
//! NIST SP 800-53 revision 5.1 control AU-3: what type of event occurred,
//! when, where, its source, its outcome, and the identities associated with
//! it.
//!
//! This crate provides:
//!
//! - [`AuditEvent`] - one immutable audit record with a unique audit ID
//! - [`EventEncoder`] - the pluggable serialization seam
//! - [`JsonLinesEncoder`] - newline-delimited JSON, one record per write
//! - [`EventWriter`] - writes events to a sink and keeps counters honest
//!
//! # Example
//!
//! ```rust
//! use aletheia_core::{AuditEvent, EventSource, EventWriter, outcome};
//!
//! let mut writer = EventWriter::json(Vec::new());
//!
//! let event = AuditEvent::new(
//!     "UserLogin",
//!     EventSource::new("IP", "127.0.0.1"),
//!     outcome::SUCCEEDED,
//!     [("username".to_string(), "ozz".to_string())].into(),
//!     "login-service",
//! );
//!
//! writer.write(&event).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod encoder;
mod error;
mod event;
pub mod outcome;
mod writer;


pub use encoder::{EventEncoder, JsonLinesEncoder};
pub use error::{EventError, WriteError};
pub use event::{AuditEvent, EventMetadata, EventSource};
pub use writer::EventWriter;
