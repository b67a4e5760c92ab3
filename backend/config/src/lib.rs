//! `hostwatch-config`: Hostwatch client configuration management.
//!
//! Provides:
//! - Typed config schema (service, session slot, auth, logging)
//! - YAML read/write with atomic replace
//! - `HOSTWATCH_*` environment overrides
//! - Default value application
//! - Validation with errors and warnings

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use schema::HostwatchConfig;
pub use io::{config_dir, config_file_path, load_config, write_config};
pub use env::{apply_env_overrides, apply_env_overrides_with};
pub use defaults::apply_all_defaults;
pub use validation::{validate, ValidationReport, ConfigValidationError};

use anyhow::Result;
use std::path::Path;

/// Load, apply env overrides, apply defaults and validate a config file.
///
/// This is the main entry point for loading a config at runtime. Validation
/// problems are logged; errors abort loading.
pub async fn load_and_prepare(path: &Path) -> Result<HostwatchConfig> {
    let config = load_config(path).await?;
    let config = apply_env_overrides(config)?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let config = apply_all_defaults(config, base_dir);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.into_iter().next() {
        return Err(first.into());
    }

    Ok(config)
}
