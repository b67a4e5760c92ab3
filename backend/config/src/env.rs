//! Environment variable overrides for config values.
//!
//! | Variable | Field |
//! |---|---|
//! | `HOSTWATCH_API_URL` | `service.baseUrl` |
//! | `HOSTWATCH_TIMEOUT_SECS` | `service.timeoutSecs` |
//! | `HOSTWATCH_CACHE_DIR` | `session.cacheDir` |
//! | `HOSTWATCH_LOG_LEVEL` | `logging.level` |
//!
//! Empty values are ignored. An unparsable timeout is an error rather than a
//! silent fallback.

use anyhow::{Context, Result};
use std::collections::HashMap;

use crate::schema::{HostwatchConfig, LoggingConfig, ServiceConfig, SessionConfig};

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: HostwatchConfig) -> Result<HostwatchConfig> {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Apply overrides from a provided map (useful for testing).
pub fn apply_env_overrides_with(
    mut config: HostwatchConfig,
    env: &HashMap<String, String>,
) -> Result<HostwatchConfig> {
    let get = |key: &str| env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

    if let Some(url) = get("HOSTWATCH_API_URL") {
        config.service.get_or_insert_with(ServiceConfig::default).base_url = Some(url.to_string());
    }
    if let Some(raw) = get("HOSTWATCH_TIMEOUT_SECS") {
        let secs: u64 = raw
            .parse()
            .with_context(|| format!("HOSTWATCH_TIMEOUT_SECS is not a number: {raw:?}"))?;
        config.service.get_or_insert_with(ServiceConfig::default).timeout_secs = Some(secs);
    }
    if let Some(dir) = get("HOSTWATCH_CACHE_DIR") {
        config.session.get_or_insert_with(SessionConfig::default).cache_dir = Some(dir.to_string());
    }
    if let Some(level) = get("HOSTWATCH_LOG_LEVEL") {
        config.logging.get_or_insert_with(LoggingConfig::default).level = Some(level.to_string());
    }
    Ok(config)
}
