//! Config defaults: applies sensible default values to parsed config.

use std::path::Path;

use crate::schema::{AuthConfig, HostwatchConfig, LoggingConfig, ServiceConfig, SessionConfig};

/// Default API root of the inventory service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5001/api";

/// Default per-request timeout (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default session slot name.
pub const DEFAULT_STORAGE_KEY: &str = "hostwatch_session";

/// Default login input granting the admin tier.
pub const DEFAULT_PRIVILEGED_IDENTIFIER: &str = "admin";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config. Directory defaults are
/// resolved relative to `config_dir`.
pub fn apply_all_defaults(config: HostwatchConfig, config_dir: &Path) -> HostwatchConfig {
    let config = apply_service_defaults(config);
    let config = apply_session_defaults(config, config_dir);
    let config = apply_auth_defaults(config);
    apply_logging_defaults(config, config_dir)
}

fn apply_service_defaults(mut config: HostwatchConfig) -> HostwatchConfig {
    let service = config.service.get_or_insert_with(ServiceConfig::default);
    if service.base_url.is_none() {
        service.base_url = Some(DEFAULT_BASE_URL.to_string());
    }
    if service.timeout_secs.is_none() {
        service.timeout_secs = Some(DEFAULT_TIMEOUT_SECS);
    }
    config
}

fn apply_session_defaults(mut config: HostwatchConfig, config_dir: &Path) -> HostwatchConfig {
    let session = config.session.get_or_insert_with(SessionConfig::default);
    if session.cache_dir.is_none() {
        session.cache_dir = Some(config_dir.join("session").display().to_string());
    }
    if session.storage_key.is_none() {
        session.storage_key = Some(DEFAULT_STORAGE_KEY.to_string());
    }
    config
}

fn apply_auth_defaults(mut config: HostwatchConfig) -> HostwatchConfig {
    let auth = config.auth.get_or_insert_with(AuthConfig::default);
    if auth.privileged_identifier.is_none() {
        auth.privileged_identifier = Some(DEFAULT_PRIVILEGED_IDENTIFIER.to_string());
    }
    config
}

fn apply_logging_defaults(mut config: HostwatchConfig, config_dir: &Path) -> HostwatchConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    if logging.dir.is_none() {
        logging.dir = Some(config_dir.join("logs").display().to_string());
    }
    if logging.json.is_none() {
        logging.json = Some(false);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_every_section() {
        let cfg = apply_all_defaults(HostwatchConfig::default(), Path::new("/tmp/hw"));
        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout_secs(), DEFAULT_TIMEOUT_SECS);
        let session = cfg.session.unwrap();
        assert_eq!(
            session.cache_dir.as_deref(),
            Some(Path::new("/tmp/hw").join("session").display().to_string().as_str())
        );
        assert_eq!(session.storage_key.as_deref(), Some(DEFAULT_STORAGE_KEY));
        assert_eq!(cfg.logging.unwrap().json, Some(false));
    }

    #[test]
    fn does_not_override_user_values() {
        let mut cfg = HostwatchConfig::default();
        cfg.service = Some(ServiceConfig {
            timeout_secs: Some(2),
            ..Default::default()
        });
        cfg.auth = Some(AuthConfig {
            privileged_identifier: Some("root".to_string()),
        });
        let cfg = apply_all_defaults(cfg, Path::new("."));
        assert_eq!(cfg.timeout_secs(), 2);
        assert_eq!(cfg.privileged_identifier(), "root");
    }
}
