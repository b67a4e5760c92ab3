//! Session lifecycle: login, logout, startup reconciliation and queries.
//!
//! ```text
//! LoggedOut ──login──▶ Authenticating ──▶ Admin | NoPrivilege
//!     ▲                                          │
//!     └─────────────────── logout ───────────────┘
//! ```
//!
//! Every operation takes `&mut self`, so one lifecycle never runs two
//! operations at once.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::cache::SessionCache;
use crate::classifier::{AuthorizationClassifier, Privilege};
use crate::error::{flatten, SessionError};
use crate::normalizer::normalize;
use crate::reconciler::{save_state, SessionReconciler};
use crate::traits::{
    AuthenticationService, QueryResponse, QueryService, RemoteSessionProbe,
    SessionTerminationService,
};
use crate::types::{login_identity, SessionState};
use crate::view::{QueryView, ViewState};

const DEFAULT_LOGIN_FAILURE: &str = "Login failed.";
const DEFAULT_QUERY_FAILURE: &str = "Query failed.";
const EMPTY_SEARCH_NOTICE: &str = "No results found.";

/// Where the lifecycle currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    LoggedOut,
    /// Held for the duration of a login call. `login` borrows the lifecycle
    /// mutably, so no caller can read it; a finished login always leaves
    /// one of the other phases.
    Authenticating,
    Admin,
    NoPrivilege,
}

impl From<Privilege> for Phase {
    fn from(p: Privilege) -> Self {
        match p {
            Privilege::Admin => Phase::Admin,
            Privilege::NoPrivilege => Phase::NoPrivilege,
        }
    }
}

/// The remote endpoints the lifecycle talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub auth: Arc<dyn AuthenticationService>,
    pub probe: Arc<dyn RemoteSessionProbe>,
    pub termination: Arc<dyn SessionTerminationService>,
    pub queries: Arc<dyn QueryService>,
}

impl Collaborators {
    /// Use one client for every endpoint.
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: AuthenticationService
            + RemoteSessionProbe
            + SessionTerminationService
            + QueryService
            + 'static,
    {
        Self {
            auth: service.clone(),
            probe: service.clone(),
            termination: service.clone(),
            queries: service,
        }
    }
}

/// Owns the current session and drives every transition.
pub struct SessionLifecycle {
    cache: Arc<dyn SessionCache>,
    remote: Collaborators,
    reconciler: SessionReconciler,
    classifier: AuthorizationClassifier,
    session: Option<SessionState>,
    phase: Phase,
}

impl SessionLifecycle {
    pub fn new(
        cache: Arc<dyn SessionCache>,
        remote: Collaborators,
        classifier: AuthorizationClassifier,
    ) -> Self {
        let reconciler = SessionReconciler::new(cache.clone(), remote.probe.clone());
        Self {
            cache,
            remote,
            reconciler,
            classifier,
            session: None,
            phase: Phase::LoggedOut,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    /// Current view, without any I/O.
    pub fn view(&self) -> ViewState {
        match &self.session {
            Some(state) => ViewState::for_session(state, self.classifier.classify(state)),
            None => ViewState::LoggedOut,
        }
    }

    /// Restore whatever session the cache and the remote probe agree on.
    pub async fn startup(&mut self) -> ViewState {
        match self.reconciler.reconcile().await {
            Some(state) => self.commit(state),
            None => {
                self.session = None;
                self.phase = Phase::LoggedOut;
                ViewState::LoggedOut
            }
        }
    }

    /// Authenticate and, on success, replace the current session entirely.
    ///
    /// `input` is stored verbatim as the session's original input; the
    /// trimmed form is what goes over the wire. A failed attempt leaves any
    /// session already held in place.
    pub async fn login(&mut self, input: &str, password: &str) -> Result<ViewState, SessionError> {
        let previous = self.phase;
        self.phase = Phase::Authenticating;

        match self.authenticate(input, password).await {
            Ok(state) => Ok(self.commit(state)),
            Err(e) => {
                self.phase = previous;
                warn!(error = %e, "Login did not complete");
                Err(e)
            }
        }
    }

    async fn authenticate(&self, input: &str, password: &str) -> Result<SessionState, SessionError> {
        let outcome = self
            .remote
            .auth
            .login(login_identity(input), password)
            .await
            .map_err(|e| SessionError::ServiceUnavailable(flatten(&e)))?;

        if !outcome.success {
            let message = outcome
                .failure_message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_LOGIN_FAILURE.to_string());
            return Err(SessionError::AuthenticationRejected(message));
        }

        let state = SessionState::from_login(input, &outcome);
        // Cache first, then memory.
        save_state(self.cache.as_ref(), &state)
            .await
            .map_err(|e| SessionError::Storage(flatten(&e)))?;
        Ok(state)
    }

    /// Always ends logged out. A failing remote call is logged and ignored.
    pub async fn logout(&mut self) -> ViewState {
        if let Err(e) = self.remote.termination.logout().await {
            let err = SessionError::LogoutFailure(flatten(&e));
            warn!(error = %err, "Remote logout failed; clearing local session anyway");
        }
        if let Err(e) = self.cache.clear().await {
            warn!(error = %flatten(&e), "Failed to clear session cache");
        }
        self.session = None;
        self.phase = Phase::LoggedOut;
        info!("Logged out");
        ViewState::LoggedOut
    }

    /// Full inventory listing for the current session.
    pub async fn list(&self) -> Result<QueryView, SessionError> {
        let identity = self.identity()?;
        let response = self
            .remote
            .queries
            .list(identity)
            .await
            .map_err(|e| SessionError::ServiceUnavailable(flatten(&e)))?;
        query_view(response, false)
    }

    /// Inventory search for the current session.
    pub async fn search(&self, term: &str) -> Result<QueryView, SessionError> {
        let identity = self.identity()?;
        let response = self
            .remote
            .queries
            .search(identity, term)
            .await
            .map_err(|e| SessionError::ServiceUnavailable(flatten(&e)))?;
        query_view(response, true)
    }

    /// Queries always carry what the user typed, never the reported name.
    fn identity(&self) -> Result<&str, SessionError> {
        self.session
            .as_ref()
            .map(|s| s.original_input.as_str())
            .ok_or(SessionError::NotLoggedIn)
    }

    fn commit(&mut self, state: SessionState) -> ViewState {
        let privilege = self.classifier.classify(&state);
        let view = ViewState::for_session(&state, privilege);
        info!(
            user = %state.reported_username,
            privilege = ?privilege,
            "Session active"
        );
        self.session = Some(state);
        self.phase = privilege.into();
        view
    }
}

fn query_view(response: QueryResponse, is_search: bool) -> Result<QueryView, SessionError> {
    let rows = normalize(&response.results);

    if response.success {
        let notice = (is_search && rows.is_empty()).then(|| EMPTY_SEARCH_NOTICE.to_string());
        return Ok(QueryView { rows, notice });
    }

    let message = response
        .message
        .filter(|m| !m.is_empty())
        .or(response.error_details.filter(|d| !d.is_empty()))
        .unwrap_or_else(|| DEFAULT_QUERY_FAILURE.to_string());

    if rows.is_empty() {
        Err(SessionError::QueryFailed(message))
    } else {
        Ok(QueryView { rows, notice: Some(message) })
    }
}
