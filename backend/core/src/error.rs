use thiserror::Error;

/// Top-level error type for the Hostwatch session core.
///
/// `CacheCorrupt`, `ProbeUnreachable` and `LogoutFailure` are recovered
/// inside the core and only ever logged; the remaining variants are
/// surfaced to the caller.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("persisted session is corrupt: {0}")]
    CacheCorrupt(String),

    #[error("session probe unreachable: {0}")]
    ProbeUnreachable(String),

    #[error("{0}")]
    AuthenticationRejected(String),

    #[error("logout failed: {0}")]
    LogoutFailure(String),

    #[error("error connecting to server: {0}")]
    ServiceUnavailable(String),

    #[error("not logged in")]
    NotLoggedIn,

    #[error("{0}")]
    QueryFailed(String),

    #[error("session storage error: {0}")]
    Storage(String),
}

/// Render an `anyhow` chain on one line, outermost context first.
pub(crate) fn flatten(err: &anyhow::Error) -> String {
    format!("{err:#}")
}
