use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::ResultRecord;

/// Remote login endpoint.
#[async_trait]
pub trait AuthenticationService: Send + Sync {
    /// Submit credentials. `Err` means the call itself failed; a rejection is
    /// an `Ok` outcome with `success == false`.
    async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome>;
}

/// Asks the remote service whether a valid session exists.
#[async_trait]
pub trait RemoteSessionProbe: Send + Sync {
    /// `Err` covers transport errors, timeouts and undecodable answers.
    async fn check(&self) -> Result<ProbeReport>;
}

/// Remote session termination. Callers ignore failures.
#[async_trait]
pub trait SessionTerminationService: Send + Sync {
    async fn logout(&self) -> Result<()>;
}

/// Inventory queries. `identity` is always the session's original input.
#[async_trait]
pub trait QueryService: Send + Sync {
    async fn list(&self, identity: &str) -> Result<QueryResponse>;

    async fn search(&self, identity: &str, term: &str) -> Result<QueryResponse>;
}

/// Result of a login call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginOutcome {
    pub success: bool,
    pub session_token: Option<String>,
    pub reported_username: Option<String>,
    pub is_admin_flag: Option<bool>,
    pub user_id: Option<i64>,
    pub failure_message: Option<String>,
}

impl LoginOutcome {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            failure_message: Some(message.into()),
            ..Default::default()
        }
    }
}

/// Answer from the session probe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeReport {
    pub active: bool,
    pub session_token: Option<String>,
    pub reported_username: Option<String>,
    /// Some services echo the login input they recorded. Only used when the
    /// client has no state of its own.
    pub original_input: Option<String>,
    pub is_admin_flag: Option<bool>,
    pub user_id: Option<i64>,
}

impl ProbeReport {
    pub fn inactive() -> Self {
        Self::default()
    }
}

/// Answer from a list or search call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub success: bool,
    #[serde(default)]
    pub results: Vec<ResultRecord>,
    pub message: Option<String>,
    pub error_details: Option<String>,
}
