//! Log Redaction Layer
//!
//! Scrubs session identifiers, bearer tokens and password fields from
//! strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static BEARER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer\s+[a-zA-Z0-9\-\._~+/]+=*").unwrap());
static SECRET_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)("?(?:password|session_id|session|token)"?\s*[:=]\s*)("[^"]*"|[^\s,&}]+)"#)
        .unwrap()
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = BEARER_RE.replace_all(input, "[REDACTED_TOKEN]");
    SECRET_FIELD_RE
        .replace_all(&redacted, "${1}[REDACTED]")
        .into_owned()
}
