//! Privilege classification.
//!
//! The tier is decided from what the human typed at login, never from the
//! identity the service reports back. A service whose storage query can be
//! steered may resolve the login to an unintended row and report that row as
//! the logged-in user; classifying on the literal client input keeps that
//! manipulation from changing the decision.

use serde::{Deserialize, Serialize};

use crate::types::{login_identity, SessionState};

/// Identifier that grants the admin tier unless configured otherwise.
pub const DEFAULT_PRIVILEGED_IDENTIFIER: &str = "admin";

/// Privilege tier of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Privilege {
    Admin,
    NoPrivilege,
}

/// Maps a session to a privilege tier using only `original_input`.
#[derive(Debug, Clone)]
pub struct AuthorizationClassifier {
    privileged: String,
}

impl Default for AuthorizationClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_PRIVILEGED_IDENTIFIER)
    }
}

impl AuthorizationClassifier {
    pub fn new(privileged_identifier: &str) -> Self {
        Self {
            privileged: fold(privileged_identifier),
        }
    }

    /// `reported_username` and `is_admin_flag` are deliberately ignored.
    pub fn classify(&self, state: &SessionState) -> Privilege {
        self.classify_input(&state.original_input)
    }

    pub fn classify_input(&self, input: &str) -> Privilege {
        let candidate = fold(input);
        if !candidate.is_empty() && candidate == self.privileged {
            Privilege::Admin
        } else {
            Privilege::NoPrivilege
        }
    }
}

fn fold(s: &str) -> String {
    login_identity(s).to_lowercase()
}
