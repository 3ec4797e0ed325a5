//! Axum middleware that audits every completed request.
//!
//! The middleware builds one [`aletheia_core::AuditEvent`] per finished
//! request and hands it to a shared [`aletheia_core::EventWriter`]. The
//! event type comes from a pre-registered route mapping (or an explicit
//! per-route [`AuditEventType`] extension), falling back to a
//! `"METHOD:path"` key; the outcome is derived from the response status by
//! a replaceable policy; subjects come from request extensions or headers
//! with an `"Unknown"` sentinel.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use aletheia_axum::{audit, AuditMiddleware};
//! use aletheia_core::EventWriter;
//! use axum::{middleware, routing::get, Router};
//!
//! let auditor = Arc::new(AuditMiddleware::new(
//!     "login-service",
//!     EventWriter::json(std::io::stdout()),
//! ));
//! auditor.register_event_type("UserList", "GET", "/users");
//!
//! let app: Router = Router::new()
//!     .route("/users", get(|| async { "ok" }))
//!     .layer(middleware::from_fn_with_state(auditor, audit));
//! ```
//!
//! Layer ordering matters: anything that populates [`AuditSubject`] must
//! run outside this middleware so the subject is present on the request by
//! the time it is inspected.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod middleware;
mod outcome;
mod subject;

pub use middleware::{audit, AuditData, AuditEventType, AuditId, AuditMiddleware};
pub use outcome::{default_outcome_handler, OutcomeHandler};
pub use subject::{default_subject_handler, AuditSubject, SubjectHandler, UNKNOWN_SUBJECT};
