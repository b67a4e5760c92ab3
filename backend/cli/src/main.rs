mod config;
mod config_cmd;
mod health_cmd;
mod inventory_cmd;
mod session_cmd;
mod terminal_output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use hostwatch_config::{config_dir, config_file_path, validate};
use hostwatch_logging::init_logger;

use config::Runtime;
use config_cmd::ConfigCommands;
use terminal_output::{note_error, note_warn, OutputFormat};

#[derive(Parser)]
#[command(name = "hostwatch")]
#[command(about = "Hostwatch: terminal client for the inventory service")]
#[command(version)]
struct Cli {
    /// Path to config.yaml (default: $HOSTWATCH_CONFIG_DIR or ~/.hostwatch)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Restore the saved session and show who is logged in
    Status,
    /// Log in; prompts for anything not given
    Login {
        /// Username, kept exactly as typed
        username: Option<String>,
        #[arg(long, env = "HOSTWATCH_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// End the session locally and on the service
    Logout,
    /// List every computer in the inventory
    List,
    /// Search the inventory
    Search {
        term: String,
    },
    /// Check that the service is reachable
    Health,
    /// Inspect or create the config file
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        note_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let Cli { config, format, command } = cli;
    terminal_output::notes_to_stderr(format == OutputFormat::Json);

    match command {
        Commands::Config(cmd) => {
            let path = config.unwrap_or_else(|| config_file_path(&config_dir()));
            config_cmd::run(cmd, path).await
        }
        Commands::Health => {
            let runtime = prepare(config).await?;
            health_cmd::run(&runtime.client, format).await
        }
        Commands::Status => {
            let mut lifecycle = prepare(config).await?.lifecycle();
            session_cmd::status(&mut lifecycle, format).await
        }
        Commands::Login { username, password } => {
            let mut lifecycle = prepare(config).await?.lifecycle();
            session_cmd::login(&mut lifecycle, username, password, format).await
        }
        Commands::Logout => {
            let mut lifecycle = prepare(config).await?.lifecycle();
            session_cmd::logout(&mut lifecycle, format).await
        }
        Commands::List => {
            let mut lifecycle = prepare(config).await?.lifecycle();
            inventory_cmd::list(&mut lifecycle, format).await
        }
        Commands::Search { term } => {
            let mut lifecycle = prepare(config).await?.lifecycle();
            inventory_cmd::search(&mut lifecycle, &term, format).await
        }
    }
}

/// Load the config and start logging. Config warnings are repeated on the
/// terminal since the logger is not up yet when they are first found.
async fn prepare(config: Option<PathBuf>) -> Result<Runtime> {
    let runtime = Runtime::load(config).await?;
    init_logger(runtime.log_dir(), runtime.config.log_level(), runtime.log_json());
    for warning in validate(&runtime.config).warnings {
        note_warn(&format!("config {}: {}", warning.path, warning.message));
    }
    debug!(
        base_url = %runtime.client.base_url(),
        cache_dir = %runtime.cache_dir().display(),
        "Runtime ready"
    );
    Ok(runtime)
}
