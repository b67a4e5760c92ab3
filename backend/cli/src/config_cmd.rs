//! CLI Config Subcommands
//!
//! Inspect and bootstrap `config.yaml`. These run without a valid config so
//! they can be used to repair one.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;

use hostwatch_config::{
    apply_all_defaults, apply_env_overrides, load_config, validate, write_config, HostwatchConfig,
};

use crate::terminal_output::{note_error, note_info, note_success, note_warn};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the config file location
    Path,
    /// Print the effective config (file, env overrides and defaults)
    Show,
    /// Report every problem with the effective config
    Validate,
    /// Write a config file populated with the defaults
    Init {
        /// Replace an existing file (the old one is kept as .bak)
        #[arg(long)]
        force: bool,
    },
}

async fn effective(path: &Path) -> Result<HostwatchConfig> {
    let config = load_config(path).await?;
    let config = apply_env_overrides(config)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(apply_all_defaults(config, base_dir))
}

pub async fn run(cmd: ConfigCommands, path: PathBuf) -> Result<()> {
    match cmd {
        ConfigCommands::Path => {
            println!("{}", path.display());
        }
        ConfigCommands::Show => {
            let config = effective(&path).await?;
            let yaml = serde_yaml::to_string(&config).context("Failed to render config")?;
            print!("{yaml}");
        }
        ConfigCommands::Validate => {
            let config = effective(&path).await?;
            let report = validate(&config);
            for warning in &report.warnings {
                note_warn(&format!("{}: {}", warning.path, warning.message));
            }
            for error in &report.errors {
                note_error(&format!("{}: {}", error.path, error.message));
            }
            if !report.is_valid() {
                anyhow::bail!("{} error(s) in {}", report.errors.len(), path.display());
            }
            note_success(&format!("{} is valid", path.display()));
        }
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                note_info(&format!(
                    "{} already exists; pass --force to replace it",
                    path.display()
                ));
                return Ok(());
            }
            let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
            let config = apply_all_defaults(HostwatchConfig::default(), base_dir);
            write_config(&config, &path).await?;
            note_success(&format!("Wrote {}", path.display()));
        }
    }
    Ok(())
}
