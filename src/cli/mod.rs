//! CLI module for the sentinel
//!
//! # Commands
//!
//! - `serve` - Run monitoring cycles back to back and serve the status API
//! - `run` - Run a single monitoring cycle (for cron-style schedulers)
//! - `status` - Print the current probe, rule and announcement state
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Long-lived service
//! sentinel serve -c sentinel.toml
//!
//! # One cycle per minute from cron
//! * * * * * sentinel run -c /etc/sentinel.toml
//!
//! # Inspect the current state
//! sentinel status --json
//! ```

pub mod completions;
pub mod config;
pub mod run;
pub mod serve;
pub mod status;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::SentinelConfig;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Failover sentinel - health-check driven page-rule failover
#[derive(Parser, Debug)]
#[command(
    name = "sentinel",
    version,
    about = "Health-check driven failover between a main and a backup page rule"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run monitoring cycles continuously and serve the status API
    Serve(ServeArgs),
    /// Run exactly one monitoring cycle
    Run(RunArgs),
    /// Show current status
    Status(StatusArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "sentinel.toml")]
    pub config: PathBuf,

    /// Override server port
    #[arg(short, long, env = "SENTINEL_PORT")]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long, env = "SENTINEL_HOST")]
    pub host: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SENTINEL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Run the control loop without the status API
    #[arg(long)]
    pub no_server: bool,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "sentinel.toml")]
    pub config: PathBuf,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SENTINEL_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "sentinel.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "sentinel.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load the config file if present, then apply environment overrides.
pub fn load_config(path: &Path) -> Result<SentinelConfig, Box<dyn std::error::Error>> {
    let config = if path.exists() {
        SentinelConfig::load(Some(path))?
    } else {
        tracing::debug!(path = %path.display(), "Config file not found, using defaults");
        SentinelConfig::default()
    };

    Ok(config.with_env_overrides())
}
