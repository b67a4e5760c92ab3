//! Config validation: deep schema checks with user-friendly error messages.

use crate::schema::HostwatchConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Storage keys become file names, so keep them to a safe alphabet.
static STORAGE_KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").unwrap());

const KNOWN_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &HostwatchConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_service(config, &mut report);
    validate_session(config, &mut report);
    validate_auth(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_service(config: &HostwatchConfig, report: &mut ValidationReport) {
    let Some(service) = &config.service else { return };
    if let Some(url) = &service.base_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            report.error("service.baseUrl", format!("'{url}' must start with http:// or https://"));
        } else if url.starts_with("http://") && !is_local(url) {
            report.warn("service.baseUrl", "Credentials will be sent over plain HTTP");
        }
    }
    if service.timeout_secs == Some(0) {
        report.error("service.timeoutSecs", "timeoutSecs must be > 0");
    }
}

fn is_local(url: &str) -> bool {
    let rest = url.trim_start_matches("http://");
    ["localhost", "127.0.0.1", "[::1]"].iter().any(|host| {
        rest.strip_prefix(host)
            .is_some_and(|tail| tail.is_empty() || tail.starts_with([':', '/']))
    })
}

fn validate_session(config: &HostwatchConfig, report: &mut ValidationReport) {
    let Some(session) = &config.session else { return };
    if let Some(key) = &session.storage_key {
        if !STORAGE_KEY_PATTERN.is_match(key) {
            report.error(
                "session.storageKey",
                format!("'{key}' may only contain letters, digits, '_', '-' and '.'"),
            );
        }
    }
    if let Some(dir) = &session.cache_dir {
        if dir.trim().is_empty() {
            report.error("session.cacheDir", "cacheDir cannot be empty");
        }
    }
}

fn validate_auth(config: &HostwatchConfig, report: &mut ValidationReport) {
    let Some(auth) = &config.auth else { return };
    let Some(id) = &auth.privileged_identifier else { return };
    if id.trim().is_empty() {
        report.error("auth.privilegedIdentifier", "privilegedIdentifier cannot be blank");
    } else if id.trim() != id {
        report.warn(
            "auth.privilegedIdentifier",
            "Surrounding whitespace is ignored when comparing login input",
        );
    }
}

fn validate_logging(config: &HostwatchConfig, report: &mut ValidationReport) {
    let Some(logging) = &config.logging else { return };
    if let Some(level) = &logging.level {
        // Full filter directives (e.g. "hostwatch_core=debug") are allowed.
        if !level.contains('=') && !KNOWN_LEVELS.contains(&level.to_lowercase().as_str()) {
            report.warn("logging.level", format!("Unknown log level '{level}'"));
        }
    }
}
