//! Session Event Logger
//!
//! Audit-style events for session transitions, emitted through `tracing`
//! under the `session_events` target so they land in the NDJSON file.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    LoginSucceeded { identity: String, tier: String },
    LoginRejected { identity: String, reason: String },
    Restored { tier: String },
    LoggedOut,
    QueryFailed { query: String, reason: String },
}

#[derive(Debug, Serialize)]
pub struct SessionEventEntry {
    pub timestamp: DateTime<Utc>,
    pub event: SessionEvent,
}

impl SessionEventEntry {
    pub fn new(mut event: SessionEvent) -> Self {
        // Failure reasons can echo request bodies back; scrub them.
        match &mut event {
            SessionEvent::LoginRejected { reason, .. } | SessionEvent::QueryFailed { reason, .. } => {
                *reason = redact_sensitive_data(reason);
            }
            _ => {}
        }
        Self {
            timestamp: Utc::now(),
            event,
        }
    }
}

pub struct SessionEventLogger;

impl SessionEventLogger {
    /// Serialize the event and hand it to the tracing system.
    pub fn log_event(event: SessionEvent) {
        let entry = SessionEventEntry::new(event);
        let payload = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: "session_events", event = %payload, "Session event");
    }
}
