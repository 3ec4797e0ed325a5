//! The audit middleware itself.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use aletheia_core::{AuditEvent, EventSource, EventWriter};
use axum::extract::{ConnectInfo, Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;
use parking_lot::{Mutex, RwLock};
use serde_json::value::RawValue;
use tracing::error;
use uuid::Uuid;

use crate::outcome::{default_outcome_handler, OutcomeHandler};
use crate::subject::{default_subject_handler, SubjectHandler};

/// Source value recorded when the client address cannot be determined.
const UNKNOWN_ADDRESS: &str = "Unknown";

/// Request extension carrying the audit ID assigned to the request.
///
/// Inserted before the inner service runs, so handlers can return the ID
/// to the client or correlate their own records with the audit log.
#[derive(Debug, Clone)]
pub struct AuditId(pub String);

/// Extension pinning an explicit event type for a route, taking precedence
/// over the registered mapping. Attach with `axum::Extension` outside the
/// audit layer so it is present when the request is inspected.
#[derive(Debug, Clone)]
pub struct AuditEventType(pub String);

/// Response extension carrying extra forensic data for the event.
///
/// A handler inserts this into its response; the payload is written
/// through verbatim as the event's `data` field.
#[derive(Debug, Clone)]
pub struct AuditData(pub Box<RawValue>);

/// Audits every request that passes through it, writing one event per
/// completed response.
///
/// Shared across requests as `Arc<AuditMiddleware>`; wire it up with
/// [`axum::middleware::from_fn_with_state`] and the [`audit`] function.
pub struct AuditMiddleware {
    component: String,
    writer: Mutex<EventWriter>,
    event_type_map: RwLock<HashMap<String, String>>,
    outcome_handler: OutcomeHandler,
    subject_handler: SubjectHandler,
}

impl std::fmt::Debug for AuditMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditMiddleware")
            .field("component", &self.component)
            .finish_non_exhaustive()
    }
}

impl AuditMiddleware {
    /// Creates a middleware writing events for `component` through
    /// `writer`.
    #[must_use]
    pub fn new(component: &str, writer: EventWriter) -> Self {
        Self {
            component: component.to_string(),
            writer: Mutex::new(writer),
            event_type_map: RwLock::new(HashMap::new()),
            outcome_handler: Arc::new(default_outcome_handler),
            subject_handler: Arc::new(default_subject_handler),
        }
    }

    /// Replaces the status-to-outcome policy.
    #[must_use]
    pub fn with_outcome_handler(mut self, handler: OutcomeHandler) -> Self {
        self.outcome_handler = handler;
        self
    }

    /// Replaces the subject extraction policy.
    #[must_use]
    pub fn with_subject_handler(mut self, handler: SubjectHandler) -> Self {
        self.subject_handler = handler;
        self
    }

    /// Registers an audit event type for a given HTTP method and path.
    ///
    /// Requests to unregistered routes fall back to the `"METHOD:path"`
    /// key as their event type.
    pub fn register_event_type(&self, event_type: &str, method: &str, path: &str) {
        self.event_type_map
            .write()
            .insert(route_key(method, path), event_type.to_string());
    }

    /// Audits one request: assigns the audit ID, runs the inner service,
    /// then builds and writes the event.
    pub async fn handle(&self, mut req: Request, next: Next) -> Response {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let audit_id = Uuid::new_v4().to_string();
        req.extensions_mut().insert(AuditId(audit_id.clone()));

        let explicit_type = req.extensions().get::<AuditEventType>().cloned();
        let client = client_address(&req);
        let subjects = (self.subject_handler)(&req);

        // The event is written after the request has been processed.
        let response = next.run(req).await;

        let mut event = AuditEvent::new_with_id(
            audit_id,
            &self.event_type(explicit_type.as_ref(), &method, &path),
            EventSource::new("IP", &client),
            &(self.outcome_handler)(response.status()),
            subjects,
            &self.component,
        )
        .with_target([("path".to_string(), path)].into());

        if let Some(AuditData(data)) = response.extensions().get::<AuditData>() {
            event = event.with_data(data.clone());
        }

        self.write(&event);
        response
    }

    fn event_type(&self, explicit: Option<&AuditEventType>, method: &Method, path: &str) -> String {
        if let Some(AuditEventType(t)) = explicit {
            return t.clone();
        }

        let key = route_key(method.as_str(), path);
        self.event_type_map
            .read()
            .get(&key)
            .cloned()
            .unwrap_or(key)
    }

    /// The response is already committed by the time the event is written,
    /// so a failed write cannot surface to the client; it is logged and
    /// counted by the writer's error counter instead of being dropped
    /// silently.
    fn write(&self, event: &AuditEvent) {
        if let Err(e) = self.writer.lock().write(event) {
            error!(
                audit_id = %event.metadata.audit_id,
                component = %self.component,
                "failed to write audit event: {e}"
            );
        }
    }
}

/// Middleware entry point for [`axum::middleware::from_fn_with_state`].
pub async fn audit(
    State(middleware): State<Arc<AuditMiddleware>>,
    req: Request,
    next: Next,
) -> Response {
    middleware.handle(req, next).await
}

fn route_key(method: &str, path: &str) -> String {
    format!("{method}:{path}")
}

/// Best-effort client address: forwarded header first, then the socket
/// peer address, then the sentinel.
fn client_address(req: &Request) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| UNKNOWN_ADDRESS.to_string(), |info| info.0.ip().to_string())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    #[test]
    fn test_route_key_format() {
        assert_eq!(route_key("GET", "/users"), "GET:/users");
    }

    #[test]
    fn test_client_address_prefers_forwarded_header() {
        let mut req = Request::new(Body::empty());
        req.headers_mut()
            .insert("x-forwarded-for", "10.0.0.9, 192.168.0.1".parse().unwrap());
        req.extensions_mut()
            .insert(ConnectInfo::<SocketAddr>("127.0.0.1:9999".parse().unwrap()));

        assert_eq!(client_address(&req), "10.0.0.9");
    }

    #[test]
    fn test_client_address_uses_peer_address() {
        let mut req = Request::new(Body::empty());
        req.extensions_mut()
            .insert(ConnectInfo::<SocketAddr>("127.0.0.1:9999".parse().unwrap()));

        assert_eq!(client_address(&req), "127.0.0.1");
    }

    #[test]
    fn test_client_address_falls_back_to_sentinel() {
        let req = Request::new(Body::empty());
        assert_eq!(client_address(&req), UNKNOWN_ADDRESS);
    }
}
