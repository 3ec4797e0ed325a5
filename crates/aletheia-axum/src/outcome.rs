//! Response-status-to-outcome policy.

use std::sync::Arc;

use aletheia_core::outcome;
use axum::http::StatusCode;

/// Maps a response status to an audit event outcome.
///
/// The thresholds are deliberately policy, not contract: services that
/// need a different reading of their status codes swap the handler via
/// [`crate::AuditMiddleware::with_outcome_handler`].
pub type OutcomeHandler = Arc<dyn Fn(StatusCode) -> String + Send + Sync>;

/// The default outcome policy: client errors (4xx) were `denied`, server
/// errors (5xx) `failed`, everything else `succeeded`.
#[must_use]
pub fn default_outcome_handler(status: StatusCode) -> String {
    if status.is_client_error() {
        outcome::DENIED.to_string()
    } else if status.is_server_error() {
        outcome::FAILED.to_string()
    } else {
        outcome::SUCCEEDED.to_string()
    }
}
