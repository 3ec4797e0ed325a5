//! The durable audit event writer.

use std::io::Write;

use aletheia_metrics::AuditMetrics;

use crate::encoder::{EventEncoder, JsonLinesEncoder};
use crate::error::WriteError;
use crate::event::AuditEvent;

/// Writes audit events to a sink through a pluggable encoder.
///
/// One call to [`EventWriter::write`] emits exactly one record and, when
/// metrics are attached, bumps the `audit_events_total` or
/// `audit_errors_total` counter depending on the outcome. The writer never
/// retries and never swallows errors: retry policy belongs to the caller or
/// to channel acquisition, not to a single write.
pub struct EventWriter {
    enc: Box<dyn EventEncoder>,
    metrics: Option<AuditMetrics>,
}

impl std::fmt::Debug for EventWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventWriter")
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl EventWriter {
    /// Creates a writer with the given encoder.
    #[must_use]
    pub fn new(enc: Box<dyn EventEncoder>) -> Self {
        Self { enc, metrics: None }
    }

    /// Creates a writer that emits newline-delimited JSON to `sink`.
    #[must_use]
    pub fn json<W: Write + Send + 'static>(sink: W) -> Self {
        Self::new(Box::new(JsonLinesEncoder::new(sink)))
    }

    /// Attaches audit counters to this writer.
    #[must_use]
    pub fn with_metrics(mut self, metrics: AuditMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Writes one audit event.
    ///
    /// The event is validated, encoded, and handed to the sink in a single
    /// encoder call. Counter updates are a side effect: success increments
    /// `audit_events_total`, failure increments `audit_errors_total`, and
    /// both are no-ops when no metrics are attached.
    ///
    /// # Errors
    ///
    /// Any validation, encode, or I/O failure is returned verbatim.
    pub fn write(&mut self, event: &AuditEvent) -> Result<(), WriteError> {
        let result = event
            .validate()
            .map_err(WriteError::from)
            .and_then(|()| self.enc.encode(event));

        if let Some(metrics) = &self.metrics {
            match &result {
                Ok(()) => metrics.inc_events(),
                Err(_) => metrics.inc_errors(),
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use aletheia_metrics::{AuditMetrics, ERRORS_TOTAL_METRIC, EVENTS_TOTAL_METRIC};
    use prometheus::Registry;

    use super::*;
    use crate::event::EventSource;
    use crate::outcome;

    /// An `io::Write` handing out a view of everything written, so tests
    /// can keep reading after the writer takes ownership.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> Vec<u8> {
            self.0.lock().unwrap().clone()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct FailingSink;
    impl Write for FailingSink {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "sink down"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn sample_event() -> AuditEvent {
        AuditEvent::new(
            "UserLogin",
            EventSource::new("IP", "127.0.0.1"),
            outcome::SUCCEEDED,
            [("username".to_string(), "ozz".to_string())].into(),
            "test-login-component",
        )
    }

    fn counter_value(registry: &Registry, name: &str) -> u64 {
        registry
            .gather()
            .iter()
            .find(|f| f.get_name() == name)
            .map_or(0, |f| f.get_metric()[0].get_counter().get_value() as u64)
    }

    #[test]
    fn test_write_emits_one_decodable_record() {
        let buf = SharedBuf::default();
        let mut writer = EventWriter::json(buf.clone());

        let event = sample_event();
        writer.write(&event).unwrap();

        let decoded: AuditEvent = serde_json::from_slice(&buf.contents()).unwrap();
        assert_eq!(decoded.metadata.audit_id, event.metadata.audit_id);
        assert_eq!(decoded.event_type, "UserLogin");
        assert_eq!(decoded.outcome, outcome::SUCCEEDED);
        assert_eq!(decoded.component, "test-login-component");
    }

    #[test]
    fn test_success_increments_events_total() {
        let registry = Registry::new();
        let metrics = AuditMetrics::with_registry("test", &registry).unwrap();
        let mut writer = EventWriter::json(Vec::new()).with_metrics(metrics);

        writer.write(&sample_event()).unwrap();

        assert_eq!(counter_value(&registry, EVENTS_TOTAL_METRIC), 1);
        assert_eq!(counter_value(&registry, ERRORS_TOTAL_METRIC), 0);
    }

    #[test]
    fn test_failure_increments_errors_total() {
        let registry = Registry::new();
        let metrics = AuditMetrics::with_registry("test", &registry).unwrap();
        let mut writer = EventWriter::json(FailingSink).with_metrics(metrics);

        let err = writer.write(&sample_event()).unwrap_err();
        assert!(matches!(err, WriteError::Io(_)));

        assert_eq!(counter_value(&registry, EVENTS_TOTAL_METRIC), 0);
        assert_eq!(counter_value(&registry, ERRORS_TOTAL_METRIC), 1);
    }

    #[test]
    fn test_invalid_event_counts_as_error() {
        let registry = Registry::new();
        let metrics = AuditMetrics::with_registry("test", &registry).unwrap();
        let buf = SharedBuf::default();
        let mut writer = EventWriter::json(buf.clone()).with_metrics(metrics);

        let mut event = sample_event();
        event.component = String::new();

        let err = writer.write(&event).unwrap_err();
        assert!(matches!(err, WriteError::Event(_)));
        assert!(buf.contents().is_empty(), "nothing must reach the sink");
        assert_eq!(counter_value(&registry, ERRORS_TOTAL_METRIC), 1);
    }

    #[test]
    fn test_write_without_metrics_is_a_counter_noop() {
        let mut writer = EventWriter::json(Vec::new());
        writer.write(&sample_event()).unwrap();
    }

    #[test]
    fn test_writer_keeps_going_after_a_bad_write() {
        let registry = Registry::new();
        let metrics = AuditMetrics::with_registry("test", &registry).unwrap();
        let buf = SharedBuf::default();
        let mut writer = EventWriter::json(buf.clone()).with_metrics(metrics);

        let mut bad = sample_event();
        bad.outcome = String::new();
        assert!(writer.write(&bad).is_err());

        writer.write(&sample_event()).unwrap();

        assert_eq!(counter_value(&registry, EVENTS_TOTAL_METRIC), 1);
        assert_eq!(counter_value(&registry, ERRORS_TOTAL_METRIC), 1);
    }
}
