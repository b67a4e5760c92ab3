//! Telemetry and structured logging components for Hostwatch.
//!
//! Handles log redaction, console and rolling NDJSON output, and session
//! audit events.

pub mod logger;
pub mod redact;
pub mod session_events;

pub use logger::init_logger;
pub use redact::redact_sensitive_data;
pub use session_events::{SessionEvent, SessionEventEntry, SessionEventLogger};
