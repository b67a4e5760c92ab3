//! In-memory collaborators for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::cache::{InMemorySessionCache, SessionCache};
use crate::traits::{
    AuthenticationService, LoginOutcome, ProbeReport, QueryResponse, QueryService,
    RemoteSessionProbe, SessionTerminationService,
};

/// Probe that always gives the same answer.
pub struct StaticProbe {
    answer: std::result::Result<ProbeReport, String>,
    pub calls: AtomicUsize,
}

impl StaticProbe {
    pub fn active(report: ProbeReport) -> Self {
        Self { answer: Ok(report), calls: AtomicUsize::new(0) }
    }

    pub fn inactive() -> Self {
        Self { answer: Ok(ProbeReport::inactive()), calls: AtomicUsize::new(0) }
    }

    pub fn unreachable(reason: &str) -> Self {
        Self { answer: Err(reason.to_string()), calls: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl RemoteSessionProbe for StaticProbe {
    async fn check(&self) -> Result<ProbeReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone().map_err(|e| anyhow!(e))
    }
}

/// Authentication endpoint with scripted answers, used in order; the last
/// one repeats. Records what it was sent.
pub struct ScriptedAuth {
    answers: Mutex<VecDeque<std::result::Result<LoginOutcome, String>>>,
    pub sent_usernames: Mutex<Vec<String>>,
}

impl ScriptedAuth {
    fn script(answer: std::result::Result<LoginOutcome, String>) -> Self {
        Self {
            answers: Mutex::new(VecDeque::from([answer])),
            sent_usernames: Mutex::new(Vec::new()),
        }
    }

    pub fn accepts(outcome: LoginOutcome) -> Self {
        Self::script(Ok(outcome))
    }

    pub fn unreachable(reason: &str) -> Self {
        Self::script(Err(reason.to_string()))
    }

    /// Answer the next call with `outcome` once earlier answers are used.
    pub fn then_answers(self, outcome: LoginOutcome) -> Self {
        self.answers.lock().unwrap().push_back(Ok(outcome));
        self
    }
}

#[async_trait]
impl AuthenticationService for ScriptedAuth {
    async fn login(&self, username: &str, _password: &str) -> Result<LoginOutcome> {
        self.sent_usernames.lock().unwrap().push(username.to_string());
        let mut answers = self.answers.lock().unwrap();
        let answer = if answers.len() > 1 {
            answers.pop_front().unwrap()
        } else {
            answers.front().cloned().unwrap()
        };
        answer.map_err(|e| anyhow!(e))
    }
}

/// Termination endpoint that can be told to fail.
pub struct ScriptedLogout {
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl ScriptedLogout {
    pub fn ok() -> Self {
        Self { fail: false, calls: AtomicUsize::new(0) }
    }

    pub fn failing() -> Self {
        Self { fail: true, calls: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl SessionTerminationService for ScriptedLogout {
    async fn logout(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(anyhow!("connection reset"))
        } else {
            Ok(())
        }
    }
}

/// Query endpoint with a scripted answer; records identities and terms.
pub struct ScriptedQuery {
    answer: std::result::Result<QueryResponse, String>,
    pub seen: Mutex<Vec<(String, Option<String>)>>,
}

impl ScriptedQuery {
    pub fn answers(response: QueryResponse) -> Self {
        Self { answer: Ok(response), seen: Mutex::new(Vec::new()) }
    }

    pub fn unreachable(reason: &str) -> Self {
        Self { answer: Err(reason.to_string()), seen: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl QueryService for ScriptedQuery {
    async fn list(&self, identity: &str) -> Result<QueryResponse> {
        self.seen.lock().unwrap().push((identity.to_string(), None));
        self.answer.clone().map_err(|e| anyhow!(e))
    }

    async fn search(&self, identity: &str, term: &str) -> Result<QueryResponse> {
        self.seen
            .lock()
            .unwrap()
            .push((identity.to_string(), Some(term.to_string())));
        self.answer.clone().map_err(|e| anyhow!(e))
    }
}

/// Cache slot whose writes or clears can be made to fail. Reads always
/// succeed.
pub struct FaultyCache {
    pub inner: InMemorySessionCache,
    fail_writes: bool,
    fail_clears: bool,
}

impl FaultyCache {
    /// Holds `raw` (if any) and refuses every write.
    pub fn rejecting_writes(raw: Option<String>) -> Self {
        let inner = raw.map(InMemorySessionCache::with_raw).unwrap_or_default();
        Self { inner, fail_writes: true, fail_clears: false }
    }

    /// Accepts writes but refuses to clear.
    pub fn rejecting_clears() -> Self {
        Self { inner: InMemorySessionCache::new(), fail_writes: false, fail_clears: true }
    }
}

#[async_trait]
impl SessionCache for FaultyCache {
    async fn read(&self) -> Result<Option<String>> {
        self.inner.read().await
    }

    async fn write(&self, raw: &str) -> Result<()> {
        if self.fail_writes {
            return Err(anyhow!("disk full"));
        }
        self.inner.write(raw).await
    }

    async fn clear(&self) -> Result<()> {
        if self.fail_clears {
            return Err(anyhow!("permission denied"));
        }
        self.inner.clear().await
    }
}
