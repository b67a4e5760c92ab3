//! Hostwatch client configuration schema.
//!
//! Every section and field is optional on disk; `apply_all_defaults` fills
//! the gaps after loading.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostwatchConfig {
    /// Remote inventory service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceConfig>,

    /// Persisted session slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionConfig>,

    /// Privilege classification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    /// API root, e.g. `http://localhost:5001/api`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Per-request timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<String>,
    /// Slot name; the cache file is `<cacheDir>/<storageKey>.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    /// Login input that grants the admin tier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privileged_identifier: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for rolling NDJSON log files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    /// Emit console output as JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

// ---------------------------------------------------------------------------
// Resolved accessors
// ---------------------------------------------------------------------------

impl HostwatchConfig {
    pub fn base_url(&self) -> &str {
        self.service
            .as_ref()
            .and_then(|s| s.base_url.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_BASE_URL)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.service
            .as_ref()
            .and_then(|s| s.timeout_secs)
            .unwrap_or(crate::defaults::DEFAULT_TIMEOUT_SECS)
    }

    pub fn storage_key(&self) -> &str {
        self.session
            .as_ref()
            .and_then(|s| s.storage_key.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_STORAGE_KEY)
    }

    pub fn privileged_identifier(&self) -> &str {
        self.auth
            .as_ref()
            .and_then(|a| a.privileged_identifier.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_PRIVILEGED_IDENTIFIER)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_LOG_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_yaml() {
        let yaml = r#"
service:
  baseUrl: https://inventory.example.com/api
  timeoutSecs: 3
auth:
  privilegedIdentifier: root
"#;
        let cfg: HostwatchConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.base_url(), "https://inventory.example.com/api");
        assert_eq!(cfg.timeout_secs(), 3);
        assert_eq!(cfg.privileged_identifier(), "root");
        assert!(cfg.session.is_none());
    }

    #[test]
    fn accessors_fall_back_to_defaults() {
        let cfg = HostwatchConfig::default();
        assert_eq!(cfg.base_url(), crate::defaults::DEFAULT_BASE_URL);
        assert_eq!(cfg.storage_key(), "hostwatch_session");
        assert_eq!(cfg.privileged_identifier(), "admin");
    }
}
