//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// phish-notifier: Gophish webhook relay
///
/// Receives signed Gophish campaign events and forwards them to Slack,
/// email and Ghostwriter.
#[derive(Debug, Parser)]
#[command(name = "phish-notifier")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long = "listen-host")]
    pub listen_host: Option<String>,

    /// Port to listen on
    #[arg(long = "listen-port")]
    pub listen_port: Option<u16>,

    /// Path Gophish posts webhooks to
    #[arg(long = "webhook-path")]
    pub webhook_path: Option<String>,

    /// Shared webhook secret configured in Gophish
    #[arg(long)]
    pub secret: Option<String>,

    /// Destination to notify: slack, email or ghostwriter (can be specified multiple times)
    #[arg(long = "profile", value_name = "NAME")]
    pub profiles: Vec<String>,

    /// Event to relay, e.g. `clicked_link` (can be specified multiple times)
    #[arg(long = "event", value_name = "NAME")]
    pub events: Vec<String>,

    /// Gophish admin URL, used for campaign links
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    /// URL prefix for IP address lookups
    #[arg(long = "ip-query-base")]
    pub ip_query_base: Option<String>,

    /// Omit recipient addresses and submitted credentials from every destination
    #[arg(long = "disable-credentials")]
    pub disable_credentials: bool,

    /// Log level: trace, debug, info, warn or error
    #[arg(long = "log-level")]
    pub log_level: Option<String>,

    /// Timeout for outbound requests in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Test mode - render and log notifications without sending them
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Subcommands for phish-notifier
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "phish-notifier.toml")]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
