//! Prometheus counters for the Aletheia audit pipeline.
//!
//! Two monotonic counters track the health of audit event delivery, both
//! labeled by the component that produced the event:
//!
//! - [`EVENTS_TOTAL_METRIC`] - number of audit events written successfully
//! - [`ERRORS_TOTAL_METRIC`] - number of audit events that failed to write
//!
//! Counters must be registered exactly once per (registry, component) pair.
//! Registration returns a [`MetricsError`] instead of aborting the process,
//! so a misconfigured service can surface the problem through its normal
//! initialization error path.
//!
//! # Example
//!
//! ```rust
//! use aletheia_metrics::AuditMetrics;
//! use prometheus::Registry;
//!
//! let registry = Registry::new();
//! let metrics = AuditMetrics::with_registry("login-service", &registry).unwrap();
//! metrics.inc_events();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use prometheus::{IntCounterVec, Opts, Registry};
use thiserror::Error;

/// Name of the counter tracking successfully written audit events.
pub const EVENTS_TOTAL_METRIC: &str = "audit_events_total";

/// Name of the counter tracking failed audit event writes.
pub const ERRORS_TOTAL_METRIC: &str = "audit_errors_total";

/// Label identifying the component that generated the event. Used by both
/// counters.
pub const COMPONENT_LABEL: &str = "component";

/// Errors that can occur while setting up audit metrics.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// The counters were already registered for this registry.
    #[error("audit metrics already registered for this registry")]
    AlreadyRegistered,

    /// Any other error from the metrics backend.
    #[error("metrics backend error: {0}")]
    Backend(#[from] prometheus::Error),
}

/// Audit event counters backed by prometheus.
///
/// Cloning is cheap; clones share the same underlying counters.
#[derive(Debug, Clone)]
pub struct AuditMetrics {
    component: String,
    n_events: IntCounterVec,
    n_errors: IntCounterVec,
}

impl AuditMetrics {
    /// Creates counters for `component` registered against the default
    /// prometheus registry.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::AlreadyRegistered`] if the counters were
    /// already registered, or a backend error for anything else.
    pub fn new(component: &str) -> Result<Self, MetricsError> {
        Self::with_registry(component, prometheus::default_registry())
    }

    /// Creates counters for `component` registered against an explicit
    /// registry.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::AlreadyRegistered`] if the counters were
    /// already registered, or a backend error for anything else.
    pub fn with_registry(component: &str, registry: &Registry) -> Result<Self, MetricsError> {
        let n_events = IntCounterVec::new(
            Opts::new(EVENTS_TOTAL_METRIC, "Number of audit events generated."),
            &[COMPONENT_LABEL],
        )?;
        let n_errors = IntCounterVec::new(
            Opts::new(ERRORS_TOTAL_METRIC, "Number of errors writing audit events."),
            &[COMPONENT_LABEL],
        )?;

        for collector in [&n_events, &n_errors] {
            registry
                .register(Box::new(collector.clone()))
                .map_err(|e| match e {
                    prometheus::Error::AlreadyReg => MetricsError::AlreadyRegistered,
                    other => MetricsError::Backend(other),
                })?;
        }

        Ok(Self {
            component: component.to_string(),
            n_events,
            n_errors,
        })
    }

    /// Increments the count of audit events that have been written.
    pub fn inc_events(&self) {
        self.n_events.with_label_values(&[&self.component]).inc();
    }

    /// Increments the count of audit event writes that have errored out.
    pub fn inc_errors(&self) {
        self.n_errors.with_label_values(&[&self.component]).inc();
    }

    /// Returns the component these counters are labeled with.
    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }
}
