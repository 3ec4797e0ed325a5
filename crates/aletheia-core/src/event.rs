//! Audit event definitions.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use uuid::Uuid;

use crate::error::EventError;

/// One audit record.
///
/// An event documents a single security-relevant action: what happened,
/// when, where, who triggered it, and how it turned out. Events are
/// constructed once via [`AuditEvent::new`], optionally decorated with the
/// `with_*` builders, then handed to a writer; they are immutable
/// thereafter.
///
/// `type` is guaranteed to be a top-level key of the serialized form so
/// that consumers doing partial JSON scanning can filter on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Metadata identifying the event.
    pub metadata: EventMetadata,

    /// Short identifier for the kind of event that occurred,
    /// e.g. `UserLogin`, `UserCreate`, `UserDelete`.
    #[serde(rename = "type")]
    pub event_type: String,

    /// When the event was logged. Always UTC, satisfying the NIST
    /// SP 800-53 AU-8 timestamp requirement.
    #[serde(rename = "loggedAt")]
    pub logged_at: DateTime<Utc>,

    /// Where the triggering request came from.
    pub source: EventSource,

    /// Outcome of the operation, e.g. whether a login succeeded or was
    /// denied. See [`crate::outcome`] for common values.
    pub outcome: String,

    /// Identities associated with the event, e.g. who triggered it.
    /// May be empty, but is always present.
    pub subjects: HashMap<String, String>,

    /// The component in which the event occurred.
    pub component: String,

    /// The target of the operation, e.g. the path of a REST resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<HashMap<String, String>>,

    /// Extra pre-encoded JSON that may be useful for forensic analysis.
    /// Written through verbatim; never re-validated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Box<RawValue>>,
}

/// Metadata identifying an audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique identifier for the audit event.
    #[serde(rename = "auditId")]
    pub audit_id: String,

    /// Additional information that aids in tracking, parsing or auditing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<HashMap<String, serde_json::Value>>,
}

/// The source of an audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSource {
    /// The source type, e.g. `IP`, `Network`, `File`, `local`.
    #[serde(rename = "type")]
    pub source_type: String,

    /// The source itself, e.g. an IP address or hostname.
    pub value: String,

    /// Additional information about the source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<HashMap<String, serde_json::Value>>,
}

impl EventSource {
    /// Creates a source without extra information.
    #[must_use]
    pub fn new(source_type: &str, value: &str) -> Self {
        Self {
            source_type: source_type.to_string(),
            value: value.to_string(),
            extra: None,
        }
    }

    /// Attaches extra information to the source.
    #[must_use]
    pub fn with_extra(mut self, extra: HashMap<String, serde_json::Value>) -> Self {
        self.extra = Some(extra);
        self
    }
}

impl AuditEvent {
    /// Creates a new event with a freshly assigned audit ID and logging
    /// time.
    #[must_use]
    pub fn new(
        event_type: &str,
        source: EventSource,
        outcome: &str,
        subjects: HashMap<String, String>,
        component: &str,
    ) -> Self {
        Self::new_with_id(
            Uuid::new_v4().to_string(),
            event_type,
            source,
            outcome,
            subjects,
            component,
        )
    }

    /// Creates a new event with a caller-supplied audit ID.
    ///
    /// Useful when the ID has to be announced before the event is complete,
    /// e.g. so an HTTP handler can expose it to the client while the
    /// middleware writes the event after the response. Uniqueness of the ID
    /// remains the caller's responsibility.
    #[must_use]
    pub fn new_with_id(
        audit_id: String,
        event_type: &str,
        source: EventSource,
        outcome: &str,
        subjects: HashMap<String, String>,
        component: &str,
    ) -> Self {
        Self {
            metadata: EventMetadata {
                audit_id,
                extra: None,
            },
            event_type: event_type.to_string(),
            logged_at: Utc::now(),
            source,
            outcome: outcome.to_string(),
            subjects,
            component: component.to_string(),
            target: None,
            data: None,
        }
    }

    /// Sets the target of the event.
    #[must_use]
    pub fn with_target(mut self, target: HashMap<String, String>) -> Self {
        self.target = Some(target);
        self
    }

    /// Sets the data of the event.
    #[must_use]
    pub fn with_data(mut self, data: Box<RawValue>) -> Self {
        self.data = Some(data);
        self
    }

    /// Sets the data of the event from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::InvalidData`] if `data` is not well-formed
    /// JSON.
    pub fn with_data_from_str(mut self, data: &str) -> Result<Self, EventError> {
        let raw = RawValue::from_string(data.to_string()).map_err(EventError::InvalidData)?;
        self.data = Some(raw);
        Ok(self)
    }

    /// Sets extra tracking information on the event metadata.
    #[must_use]
    pub fn with_metadata_extra(mut self, extra: HashMap<String, serde_json::Value>) -> Self {
        self.metadata.extra = Some(extra);
        self
    }

    /// Checks that the fields required for a meaningful audit record are
    /// populated.
    ///
    /// Empty fields are never silently defaulted; a sentinel such as
    /// `"Unknown"` is a collaborator policy, not the model's.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::MissingField`] naming the first empty required
    /// field.
    pub fn validate(&self) -> Result<(), EventError> {
        for (field, value) in [
            ("type", &self.event_type),
            ("source.type", &self.source.source_type),
            ("outcome", &self.outcome),
            ("component", &self.component),
        ] {
            if value.is_empty() {
                return Err(EventError::MissingField { field });
            }
        }
        Ok(())
    }
}
