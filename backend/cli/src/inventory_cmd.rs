//! CLI Inventory Commands
//!
//! `list` and `search`, available to the admin tier only.

use anyhow::Result;

use hostwatch_core::{QueryView, SessionError, SessionLifecycle, ViewState};
use hostwatch_logging::{SessionEvent, SessionEventLogger};

use crate::terminal_output::{note_error, print_query_view, OutputFormat};

/// Restore the session and require the admin tier.
async fn require_admin(lifecycle: &mut SessionLifecycle) -> Result<()> {
    match lifecycle.startup().await {
        ViewState::LoggedOut => anyhow::bail!("Not logged in. Run `hostwatch login` first."),
        ViewState::NoPrivilege { .. } => {
            anyhow::bail!("This account has no administrative privileges.")
        }
        ViewState::Admin { .. } => Ok(()),
    }
}

fn record_failure(query: &str, err: &SessionError) {
    if let SessionError::QueryFailed(reason) | SessionError::ServiceUnavailable(reason) = err {
        SessionEventLogger::log_event(SessionEvent::QueryFailed {
            query: query.to_string(),
            reason: reason.clone(),
        });
    }
}

fn report(query: &str, result: Result<QueryView, SessionError>, format: OutputFormat) -> Result<()> {
    match result {
        Ok(view) => print_query_view(&view, format),
        Err(e) => {
            record_failure(query, &e);
            Err(e.into())
        }
    }
}

pub async fn list(lifecycle: &mut SessionLifecycle, format: OutputFormat) -> Result<()> {
    require_admin(lifecycle).await?;
    report("list", lifecycle.list().await, format)
}

pub async fn search(
    lifecycle: &mut SessionLifecycle,
    term: &str,
    format: OutputFormat,
) -> Result<()> {
    require_admin(lifecycle).await?;
    report(term, lifecycle.search(term).await, format)
}

/// Listing shown right after login or status. A failure here is reported
/// but does not fail the command that triggered it.
pub async fn show_listing(lifecycle: &SessionLifecycle, format: OutputFormat) {
    if let Err(e) = report("list", lifecycle.list().await, format) {
        note_error(&format!("Error loading computers: {e}"));
    }
}
