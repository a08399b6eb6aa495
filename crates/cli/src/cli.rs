//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Price Relay - market data to chat relay bot
#[derive(Parser, Debug)]
#[command(
    name = "price-relay",
    author,
    version,
    about = "Market data to chat relay bot",
    long_about = "Relays market data snapshots into chat messages.\n\n\
                  Periodically fetches a JSON snapshot, renders it through a \n\
                  placeholder template, and keeps configured chat messages up to \n\
                  date via rate-limited edits. Also answers an on-demand price \n\
                  command from authorized senders."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "PRICE_RELAY_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "PRICE_RELAY_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the relay
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "relay.toml", env = "PRICE_RELAY_CONFIG")]
    pub config: PathBuf,

    /// Override bot token from configuration
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Override market data URL from configuration
    #[arg(long, env = "PRICE_RELAY_DATA_URL")]
    pub data_url: Option<String>,

    /// Override scheduled update interval in seconds
    #[arg(long, env = "PRICE_RELAY_INTERVAL")]
    pub interval: Option<u64>,

    /// Relay timeout in seconds (0 = run until shutdown signal)
    #[arg(long, default_value = "0", env = "PRICE_RELAY_TIMEOUT")]
    pub timeout: u64,

    /// Validate configuration and exit without running
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "PRICE_RELAY_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "relay.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
