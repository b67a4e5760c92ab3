use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use hostwatch_core::{
    AuthenticationService, LoginOutcome, ProbeReport, QueryResponse, QueryService,
    RemoteSessionProbe, SessionTerminationService,
};

use crate::wire::{
    HealthStatus, InventoryResponse, LoginRequest, LoginResponse, SessionResponse,
};

/// HTTP client for the inventory service. One instance serves every
/// collaborator role and keeps the server-side session cookie in its jar.
pub struct InventoryClient {
    client: Client,
    base_url: String,
}

impl InventoryClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Service liveness, used by `hostwatch health`.
    pub async fn health(&self) -> Result<HealthStatus> {
        let response = self
            .client
            .get(self.url("health"))
            .send()
            .await
            .context("Health check request failed")?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Health check returned {}", status);
        }
        decode(response, "health").await
    }
}

/// Decode a JSON body whatever the status code; the body's `success` field
/// is what the service uses to signal failures.
async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .with_context(|| format!("Failed to read {what} response"))?;
    serde_json::from_str(&body)
        .with_context(|| format!("Failed to parse {what} response (status {status})"))
}

#[async_trait]
impl AuthenticationService for InventoryClient {
    async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome> {
        debug!(username = %username, "Sending login request");
        let response = self
            .client
            .post(self.url("login"))
            .json(&LoginRequest { username, password })
            .send()
            .await
            .context("Login request failed")?;
        let body: LoginResponse = decode(response, "login").await?;
        Ok(body.into())
    }
}

#[async_trait]
impl RemoteSessionProbe for InventoryClient {
    async fn check(&self) -> Result<ProbeReport> {
        let response = self
            .client
            .get(self.url("session"))
            .send()
            .await
            .context("Session probe request failed")?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            debug!("Session probe: no active session");
            return Ok(ProbeReport::inactive());
        }
        if !status.is_success() {
            anyhow::bail!("Session probe returned {}", status);
        }
        let body: SessionResponse = decode(response, "session").await?;
        Ok(body.into())
    }
}

#[async_trait]
impl SessionTerminationService for InventoryClient {
    async fn logout(&self) -> Result<()> {
        let response = self
            .client
            .post(self.url("logout"))
            .send()
            .await
            .context("Logout request failed")?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Logout returned {}", status);
        }
        Ok(())
    }
}

#[async_trait]
impl QueryService for InventoryClient {
    async fn list(&self, identity: &str) -> Result<QueryResponse> {
        let response = self
            .client
            .get(self.url("computers"))
            .query(&[("username", identity)])
            .send()
            .await
            .context("Inventory listing request failed")?;
        let body: InventoryResponse = decode(response, "listing").await?;
        Ok(body.into())
    }

    async fn search(&self, identity: &str, term: &str) -> Result<QueryResponse> {
        debug!(term = %term, "Searching inventory");
        let response = self
            .client
            .get(self.url("search"))
            .query(&[("username", identity), ("q", term)])
            .send()
            .await
            .context("Inventory search request failed")?;
        let body: InventoryResponse = decode(response, "search").await?;
        Ok(body.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let client = InventoryClient::with_client(Client::new(), "http://localhost:5001/api/");
        assert_eq!(client.base_url(), "http://localhost:5001/api");
        assert_eq!(client.url("session"), "http://localhost:5001/api/session");
    }

    #[tokio::test]
    async fn unreachable_service_is_a_probe_failure() {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let client =
            InventoryClient::new("http://127.0.0.1:9/api", Duration::from_millis(500)).unwrap();
        assert!(client.check().await.is_err());
    }
}
