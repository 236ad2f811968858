//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error hints
//! that support the main entry point.

use phish_notifier::config::{ConfigError, field};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - invalid args, missing required fields, etc.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Runtime error (exit code 2) - bind failure, server error, etc.
    ///
    /// Note: This is a function rather than a constant because `ExitCode::from()` is not `const fn`.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Prints helpful hints for common configuration errors.
pub fn print_config_hint(error: &ConfigError) {
    match error {
        ConfigError::MissingRequired { field: f, .. } if *f == field::SECRET => {
            eprintln!("\nRun 'phish-notifier init' to generate a configuration template.");
        }
        ConfigError::FileRead { .. } => {
            eprintln!("\nRun 'phish-notifier init' to generate a configuration template.");
        }
        ConfigError::UnknownProfile(_) => {
            eprintln!("\nKnown profiles: slack, email, ghostwriter.");
        }
        _ => {}
    }
}

/// Sets up the tracing subscriber for logging.
///
/// `--verbose` raises the configured level to at least DEBUG. `RUST_LOG`
/// still overrides both.
pub fn setup_tracing(level: Level, verbose: bool) {
    let level = if verbose { level.max(Level::DEBUG) } else { level };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
