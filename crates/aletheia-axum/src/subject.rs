//! Subject extraction from requests.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::Request;

/// Sentinel used when no identity can be determined for a request.
///
/// This fallback is middleware policy; the event model itself never
/// defaults an empty field.
pub const UNKNOWN_SUBJECT: &str = "Unknown";

/// Request extension carrying the authenticated subjects, typically
/// inserted by an authentication layer running outside the audit layer.
#[derive(Debug, Clone)]
pub struct AuditSubject(pub HashMap<String, String>);

/// Extracts the subject map for a request. Called before the request is
/// handed to the inner service.
pub type SubjectHandler = Arc<dyn Fn(&Request) -> HashMap<String, String> + Send + Sync>;

/// The default subject handler: the [`AuditSubject`] extension when
/// present, otherwise the `X-User-Id` header, otherwise the
/// [`UNKNOWN_SUBJECT`] sentinel for both `user` and `sub`.
#[must_use]
pub fn default_subject_handler(req: &Request) -> HashMap<String, String> {
    if let Some(AuditSubject(subjects)) = req.extensions().get::<AuditSubject>() {
        return subjects.clone();
    }

    let user = req
        .headers()
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or(UNKNOWN_SUBJECT);

    [
        ("user".to_string(), user.to_string()),
        ("sub".to_string(), UNKNOWN_SUBJECT.to_string()),
    ]
    .into()
}
