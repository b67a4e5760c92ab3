//! CLI Session Commands
//!
//! `status`, `login` and `logout`. Each invocation is a fresh process, so
//! every command starts by restoring whatever session the slot holds.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdin};

use hostwatch_core::{login_identity, SessionError, SessionLifecycle, ViewState};
use hostwatch_logging::{SessionEvent, SessionEventLogger};

use crate::inventory_cmd;
use crate::terminal_output::{note_info, print_view, OutputFormat};

pub(crate) fn tier(view: &ViewState) -> &'static str {
    match view {
        ViewState::LoggedOut => "logged-out",
        ViewState::Admin { .. } => "admin",
        ViewState::NoPrivilege { .. } => "no-privilege",
    }
}

/// Restore the session and show it. Admins also get the inventory listing,
/// as the dashboard does on load.
pub async fn status(lifecycle: &mut SessionLifecycle, format: OutputFormat) -> Result<()> {
    let view = lifecycle.startup().await;
    if view.is_logged_in() {
        SessionEventLogger::log_event(SessionEvent::Restored {
            tier: tier(&view).to_string(),
        });
    }
    print_view(&view, format)?;
    if matches!(view, ViewState::Admin { .. }) && format != OutputFormat::Json {
        inventory_cmd::show_listing(lifecycle, format).await;
    }
    Ok(())
}

pub async fn login(
    lifecycle: &mut SessionLifecycle,
    username: Option<String>,
    password: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let mut prompt = Prompt::new();
    let input = match username {
        Some(u) => u,
        None => prompt.ask("Username: ").await?,
    };
    let password = match password {
        Some(p) => p,
        None => prompt.ask("Password: ").await?,
    };

    match lifecycle.login(&input, &password).await {
        Ok(view) => {
            SessionEventLogger::log_event(SessionEvent::LoginSucceeded {
                identity: login_identity(&input).to_string(),
                tier: tier(&view).to_string(),
            });
            print_view(&view, format)?;
            if matches!(view, ViewState::Admin { .. }) && format != OutputFormat::Json {
                inventory_cmd::show_listing(lifecycle, format).await;
            }
            Ok(())
        }
        Err(e) => {
            if let SessionError::AuthenticationRejected(reason) = &e {
                SessionEventLogger::log_event(SessionEvent::LoginRejected {
                    identity: login_identity(&input).to_string(),
                    reason: reason.clone(),
                });
            }
            Err(e.into())
        }
    }
}

pub async fn logout(lifecycle: &mut SessionLifecycle, format: OutputFormat) -> Result<()> {
    let before = lifecycle.startup().await;
    if !before.is_logged_in() {
        note_info("No session to end; clearing local state anyway.");
    }
    let view = lifecycle.logout().await;
    SessionEventLogger::log_event(SessionEvent::LoggedOut);
    print_view(&view, format)
}

/// Line reader over stdin. Labels go to stderr so stdout carries only
/// command output.
struct Prompt {
    reader: BufReader<Stdin>,
}

impl Prompt {
    fn new() -> Self {
        Self {
            reader: BufReader::new(tokio::io::stdin()),
        }
    }

    /// Read one line. Only the line terminator is removed; the rest is kept
    /// verbatim as the login input.
    async fn ask(&mut self, label: &str) -> Result<String> {
        let mut stderr = tokio::io::stderr();
        stderr.write_all(label.as_bytes()).await?;
        stderr.flush().await?;

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .await
            .context("Failed to read from stdin")?;
        if read == 0 {
            anyhow::bail!("stdin closed before {}", label.trim_end_matches([':', ' ']));
        }
        Ok(strip_line_ending(line))
    }
}

fn strip_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_line_ending_is_stripped() {
        assert_eq!(strip_line_ending("Admin \n".to_string()), "Admin ");
        assert_eq!(strip_line_ending(" bob\r\n".to_string()), " bob");
        assert_eq!(strip_line_ending("carol".to_string()), "carol");
    }

    #[test]
    fn tiers_follow_the_view() {
        assert_eq!(tier(&ViewState::LoggedOut), "logged-out");
        assert_eq!(
            tier(&ViewState::Admin {
                username: "bob".to_string()
            }),
            "admin"
        );
        assert_eq!(
            tier(&ViewState::NoPrivilege {
                display_identity: "guest".to_string()
            }),
            "no-privilege"
        );
    }
}
