//! CLI Health Command
//!
//! Reports whether the inventory service answers on its health endpoint.

use anyhow::{Context, Result};

use hostwatch_remote::InventoryClient;

use crate::terminal_output::{note_success, OutputFormat};

pub async fn run(client: &InventoryClient, format: OutputFormat) -> Result<()> {
    let health = client
        .health()
        .await
        .with_context(|| format!("{} is not reachable", client.base_url()))?;
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&health)?);
    } else {
        note_success(&format!("{} is {}", client.base_url(), health.status));
    }
    Ok(())
}
