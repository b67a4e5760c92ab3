//! Session reconciliation: merge the cached snapshot with the remote probe.
//!
//! Precedence is fixed:
//!
//! 1. A usable cached snapshot is adopted tentatively.
//! 2. If the probe confirms an active session, the probe's fields overwrite
//!    the tentative state (except the original login input) and the result
//!    is persisted again.
//! 3. If the probe fails or says "no session", the cached snapshot stands
//!    untouched. An unreachable service never logs anybody out.
//! 4. Without a usable cache, only an active probe answer produces a
//!    session.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::cache::SessionCache;
use crate::error::{flatten, SessionError};
use crate::traits::{ProbeReport, RemoteSessionProbe};
use crate::types::{PersistedSession, SessionState};

/// What the probe said, collapsed to the three cases the merge cares about.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Active(ProbeReport),
    Inactive,
    Unreachable(String),
}

impl ProbeOutcome {
    pub fn from_result(result: Result<ProbeReport>) -> Self {
        match result {
            Ok(report) if report.active => ProbeOutcome::Active(report),
            Ok(_) => ProbeOutcome::Inactive,
            Err(e) => ProbeOutcome::Unreachable(flatten(&e)),
        }
    }
}

/// Output of [`merge`]: the resulting state and whether it has to be
/// written back to the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub state: Option<SessionState>,
    pub persist: bool,
}

/// Pure precedence rule between a cached snapshot and a probe answer.
pub fn merge(cached: Option<SessionState>, probe: &ProbeOutcome) -> Reconciliation {
    match (cached, probe) {
        (Some(mut state), ProbeOutcome::Active(report)) => {
            state.refresh_from(report);
            Reconciliation { state: Some(state), persist: true }
        }
        (Some(state), _) => Reconciliation { state: Some(state), persist: false },
        (None, ProbeOutcome::Active(report)) => Reconciliation {
            state: Some(SessionState::from_probe(report)),
            persist: true,
        },
        (None, _) => Reconciliation { state: None, persist: false },
    }
}

/// Result of reading the cache slot.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedSession {
    Empty,
    Loaded(SessionState),
    Corrupt(String),
}

/// Read and parse the cache slot. Read errors count as an empty slot.
pub async fn load_cached(cache: &dyn SessionCache) -> CachedSession {
    let raw = match cache.read().await {
        Ok(Some(raw)) => raw,
        Ok(None) => return CachedSession::Empty,
        Err(e) => {
            warn!(error = %flatten(&e), "Session cache unreadable; treating as empty");
            return CachedSession::Empty;
        }
    };
    match PersistedSession::parse(&raw) {
        Ok(persisted) => CachedSession::Loaded(persisted.into()),
        Err(reason) => CachedSession::Corrupt(reason),
    }
}

/// Serialize a state into the cache slot.
pub async fn save_state(cache: &dyn SessionCache, state: &SessionState) -> Result<()> {
    let raw = serde_json::to_string(&PersistedSession::from(state))
        .context("Failed to serialize session")?;
    cache.write(&raw).await
}

/// Merges the persisted cache with the remote probe into one session.
pub struct SessionReconciler {
    cache: Arc<dyn SessionCache>,
    probe: Arc<dyn RemoteSessionProbe>,
}

impl SessionReconciler {
    pub fn new(cache: Arc<dyn SessionCache>, probe: Arc<dyn RemoteSessionProbe>) -> Self {
        Self { cache, probe }
    }

    /// Produce the authoritative session, or `None` when logged out.
    ///
    /// Never fails: a corrupt cache is discarded and an unreachable probe
    /// falls back to cached trust.
    pub async fn reconcile(&self) -> Option<SessionState> {
        let cached = match load_cached(self.cache.as_ref()).await {
            CachedSession::Loaded(state) => {
                debug!(user = %state.reported_username, "Adopted cached session tentatively");
                Some(state)
            }
            CachedSession::Empty => None,
            CachedSession::Corrupt(reason) => {
                let err = SessionError::CacheCorrupt(reason);
                warn!(error = %err, "Discarding persisted session");
                if let Err(e) = self.cache.clear().await {
                    warn!(error = %flatten(&e), "Failed to clear corrupt session cache");
                }
                None
            }
        };
        let had_cache = cached.is_some();

        let outcome = ProbeOutcome::from_result(self.probe.check().await);
        match &outcome {
            ProbeOutcome::Active(_) => debug!("Session probe confirmed an active session"),
            ProbeOutcome::Inactive => debug!("Session probe reported no active session"),
            ProbeOutcome::Unreachable(reason) => {
                let err = SessionError::ProbeUnreachable(reason.clone());
                if had_cache {
                    warn!(error = %err, "Using cached session without verification");
                } else {
                    warn!(error = %err, "No cached session and probe failed");
                }
            }
        }

        let Reconciliation { state, persist } = merge(cached, &outcome);
        if persist {
            if let Some(state) = &state {
                if let Err(e) = save_state(self.cache.as_ref(), state).await {
                    warn!(error = %flatten(&e), "Failed to persist reconciled session");
                }
            }
        }

        match &state {
            Some(s) => info!(user = %s.reported_username, verified = persist, "Session reconciled"),
            None => info!("No session to restore"),
        }
        state
    }
}
