//! The pluggable serialization seam between events and their sink.

use std::io::Write;

use crate::error::WriteError;
use crate::event::AuditEvent;

/// Encodes audit events onto some sink.
///
/// One call to [`EventEncoder::encode`] must produce one complete,
/// self-delimited record. Implementations may be bound to JSON, protocol
/// buffers, or anything else the downstream collector understands.
pub trait EventEncoder: Send {
    /// Encodes a single event.
    ///
    /// # Errors
    ///
    /// Returns a [`WriteError`] if the event cannot be serialized or the
    /// sink rejects the write.
    fn encode(&mut self, event: &AuditEvent) -> Result<(), WriteError>;
}

/// Newline-delimited JSON encoder: one JSON object per event, terminated by
/// a line feed.
///
/// The record is serialized into a buffer and emitted through a single
/// `write_all` call. On an `O_APPEND` file descriptor this keeps concurrent
/// producers from interleaving partial records, as long as individual
/// records stay below the 4096-byte atomic-append ceiling documented for
/// the pipeline. The encoder itself does no locking and no cross-call
/// buffering.
#[derive(Debug)]
pub struct JsonLinesEncoder<W> {
    sink: W,
}

impl<W: Write + Send> JsonLinesEncoder<W> {
    /// Creates an encoder writing to `sink`.
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Consumes the encoder and returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write + Send> EventEncoder for JsonLinesEncoder<W> {
    fn encode(&mut self, event: &AuditEvent) -> Result<(), WriteError> {
        let mut buf = serde_json::to_vec(event)?;
        buf.push(b'\n');
        self.sink.write_all(&buf)?;
        Ok(())
    }
}
