//! Configuration layer for phish-notifier.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! For lists (`profiles`, `events`), CLI values **replace** the TOML list
//! entirely (not merged).
//!
//! # Config File Discovery
//!
//! Without `--config`, the first existing file among [`config_candidates`] is
//! loaded. Without any file, only CLI arguments and defaults apply.
//!
//! # Boolean Flag Semantics
//!
//! Boolean flags (`--disable-credentials`, `--dry-run`) use OR semantics:
//! - If set `true` in either CLI or TOML, the result is `true`.
//! - Once set `true` in TOML, CLI cannot override to `false` (flags only enable, not disable).
//!
//! Per-destination `disable_credentials` settings are OR-ed with the global
//! `dispatch.disable_credentials`.
//!
//! # TOML-Only Options
//!
//! Destination settings (`[slack]`, `[email]`, `[ghostwriter]`),
//! `dispatch.unrecognized_failure` and the email templates are only read
//! from the config file.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;


pub use cli::{Cli, Command};
pub use error::{ConfigError, field};
pub use toml::{TomlConfig, default_config_template};
pub use validated::{ValidatedConfig, config_candidates, write_default_config};
