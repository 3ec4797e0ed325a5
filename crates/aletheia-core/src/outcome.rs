//! Sample outcomes that may be used in audit events.
//!
//! The outcome vocabulary is open-ended; these constants cover the common
//! cases and are what the default HTTP middleware policy emits.

/// The audited operation succeeded.
pub const SUCCEEDED: &str = "succeeded";

/// The audited operation failed.
pub const FAILED: &str = "failed";

/// The audited operation was approved.
pub const APPROVED: &str = "approved";

/// The audited operation was denied.
pub const DENIED: &str = "denied";
