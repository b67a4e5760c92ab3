use serde::Serialize;

use crate::classifier::Privilege;
use crate::types::{DisplayTuple, SessionState};

/// What the presentation layer should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "kebab-case")]
pub enum ViewState {
    /// Show the login entry point.
    LoggedOut,
    /// Admin panel, greeting the account the service reports.
    Admin { username: String },
    /// Limited panel, showing who the user logged in as.
    NoPrivilege { display_identity: String },
}

impl ViewState {
    pub fn for_session(state: &SessionState, privilege: Privilege) -> Self {
        match privilege {
            Privilege::Admin => ViewState::Admin {
                username: state.reported_username.clone(),
            },
            Privilege::NoPrivilege => ViewState::NoPrivilege {
                display_identity: state.display_identity().to_string(),
            },
        }
    }

    pub fn is_logged_in(&self) -> bool {
        !matches!(self, ViewState::LoggedOut)
    }
}

/// Normalized rows from a list or search call, plus an optional notice for
/// the user (empty result, partial failure).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryView {
    pub rows: Vec<DisplayTuple>,
    pub notice: Option<String>,
}
