//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use http::HeaderValue;
use tracing::Level;
use url::Url;

use crate::event::{EnabledEvents, EventKind, UnrecognizedFailure};
use crate::render::{ChatOptions, EmailTemplates, email_defaults};
use crate::transport::{
    DEFAULT_MUTATION, EmailSettings, GhostwriterSettings, Profile, SlackSettings, split_host_addr,
};

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::{EmailSection, GhostwriterSection, SlackSection, TomlConfig};

/// Fully validated configuration ready for use by the application.
///
/// This struct represents a complete, validated configuration where all
/// required fields are present and all values have been validated.
/// Settings exist only for the destinations listed in `profiles`.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Address to listen on
    pub listen_host: String,

    /// Port to listen on
    pub listen_port: u16,

    /// Path Gophish posts to
    pub webhook_path: String,

    /// Shared webhook secret
    pub secret: String,

    /// Destinations, in delivery order
    pub profiles: Vec<Profile>,

    /// Event kinds that are relayed
    pub events: EnabledEvents,

    /// Handling of failed events with an unknown tag
    pub unrecognized_failure: UnrecognizedFailure,

    /// Log level
    pub log_level: Level,

    /// Outbound request timeout
    pub timeout: Duration,

    /// Slack settings, when the slack profile is enabled
    pub slack: Option<SlackSettings>,

    /// Email settings, when the email profile is enabled
    pub email: Option<EmailSettings>,

    /// Ghostwriter settings, when the ghostwriter profile is enabled
    pub ghostwriter: Option<GhostwriterSettings>,

    /// Dry-run mode (render notifications without sending them)
    pub dry_run: bool,

    /// Verbose logging enabled
    pub verbose: bool,

    /// Config file the settings were read from, if any
    pub config_file: Option<PathBuf>,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let profiles = self
            .profiles
            .iter()
            .map(|p| p.name())
            .collect::<Vec<_>>()
            .join(", ");

        write!(
            f,
            "Config {{ listen: {}:{}{}, profiles: [{}], events: {}, unrecognized_failure: {}, \
             timeout: {}s, dry_run: {} }}",
            self.listen_host,
            self.listen_port,
            self.webhook_path,
            profiles,
            self.events,
            self.unrecognized_failure,
            self.timeout.as_secs(),
            self.dry_run,
        )
    }
}

/// Options shared by every destination.
struct Shared<'a> {
    redact: bool,
    base_url: Option<&'a str>,
    ip_query_base: Option<&'a str>,
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The secret is missing
    /// - The profile list is empty or names an unknown profile
    /// - An event name is unknown
    /// - A required key of an enabled profile is missing
    /// - A URL, email address, log level or duration is invalid
    /// - An email template fails to compile
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let secret = cli
            .secret
            .clone()
            .or_else(|| toml.and_then(|t| t.server.secret.clone()))
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ConfigError::missing(field::SECRET, "Use --secret or set server.secret in config file")
            })?;

        let listen_host = cli
            .listen_host
            .clone()
            .or_else(|| toml.and_then(|t| t.server.listen_host.clone()))
            .unwrap_or_else(|| defaults::LISTEN_HOST.to_string());

        let listen_port = cli
            .listen_port
            .or_else(|| toml.and_then(|t| t.server.listen_port))
            .unwrap_or(defaults::LISTEN_PORT);

        let webhook_path = Self::resolve_webhook_path(cli, toml)?;
        let profiles = Self::resolve_profiles(cli, toml)?;
        let events = Self::resolve_events(cli, toml)?;
        let unrecognized_failure = Self::resolve_unrecognized_failure(toml)?;
        let log_level = Self::resolve_log_level(cli, toml)?;
        let timeout = Self::resolve_timeout(cli, toml)?;

        let base_url = cli
            .base_url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.dispatch.base_url.as_deref()))
            .filter(|s| !s.is_empty());
        if let Some(base_url) = base_url {
            parse_url("dispatch.base_url", base_url)?;
        }

        let ip_query_base = cli
            .ip_query_base
            .as_deref()
            .or_else(|| toml.and_then(|t| t.dispatch.ip_query_base.as_deref()))
            .unwrap_or(defaults::IP_QUERY_BASE);
        let ip_query_base = (!ip_query_base.is_empty()).then_some(ip_query_base);
        if let Some(ip_query_base) = ip_query_base {
            parse_url("dispatch.ip_query_base", ip_query_base)?;
        }

        // Flags only enable
        let shared = Shared {
            redact: cli.disable_credentials || toml.is_some_and(|t| t.dispatch.disable_credentials),
            base_url,
            ip_query_base,
        };

        let empty = TomlConfig::default();
        let sections = toml.unwrap_or(&empty);

        let slack = profiles
            .contains(&Profile::Slack)
            .then(|| build_slack(&sections.slack, &shared))
            .transpose()?;
        let email = profiles
            .contains(&Profile::Email)
            .then(|| build_email(&sections.email, &shared))
            .transpose()?;
        let ghostwriter = profiles
            .contains(&Profile::Ghostwriter)
            .then(|| build_ghostwriter(&sections.ghostwriter, &shared))
            .transpose()?;

        Ok(Self {
            listen_host,
            listen_port,
            webhook_path,
            secret,
            profiles,
            events,
            unrecognized_failure,
            log_level,
            timeout,
            slack,
            email,
            ghostwriter,
            dry_run: cli.dry_run,
            verbose: cli.verbose,
            config_file: None,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path. Otherwise the
    /// first existing file among [`config_candidates`] is used, if any. The
    /// chosen path is kept in [`ValidatedConfig::config_file`].
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let path = cli
            .config
            .clone()
            .or_else(|| config_candidates().into_iter().find(|p| p.is_file()));

        let toml = path.as_deref().map(TomlConfig::load).transpose()?;

        let mut config = Self::from_raw(cli, toml.as_ref())?;
        config.config_file = path;
        Ok(config)
    }

    fn resolve_webhook_path(cli: &Cli, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        let path = cli
            .webhook_path
            .as_deref()
            .or_else(|| toml.and_then(|t| t.server.webhook_path.as_deref()))
            .unwrap_or(defaults::WEBHOOK_PATH);

        if !path.starts_with('/') {
            return Err(ConfigError::InvalidWebhookPath(path.to_string()));
        }
        Ok(path.to_string())
    }

    fn resolve_profiles(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Vec<Profile>, ConfigError> {
        // CLI list replaces the TOML list entirely
        let names: Vec<&str> = if cli.profiles.is_empty() {
            match toml.and_then(|t| t.dispatch.profiles.as_ref()) {
                Some(list) => list.iter().map(String::as_str).collect(),
                None => defaults::PROFILES.to_vec(),
            }
        } else {
            cli.profiles.iter().map(String::as_str).collect()
        };

        let mut profiles = Vec::with_capacity(names.len());
        for name in names {
            let profile = Profile::from_str(name).map_err(ConfigError::UnknownProfile)?;
            if !profiles.contains(&profile) {
                profiles.push(profile);
            }
        }

        if profiles.is_empty() {
            return Err(ConfigError::NoProfiles);
        }
        Ok(profiles)
    }

    fn resolve_events(cli: &Cli, toml: Option<&TomlConfig>) -> Result<EnabledEvents, ConfigError> {
        // CLI list replaces the TOML list entirely
        let names: Option<Vec<&str>> = if cli.events.is_empty() {
            toml.and_then(|t| t.dispatch.events.as_ref())
                .map(|list| list.iter().map(String::as_str).collect())
        } else {
            Some(cli.events.iter().map(String::as_str).collect())
        };

        let Some(names) = names else {
            return Ok(EnabledEvents::all());
        };

        names
            .into_iter()
            .map(|name| EventKind::from_str(name).map_err(|e| ConfigError::UnknownEvent(e.0)))
            .collect()
    }

    fn resolve_unrecognized_failure(
        toml: Option<&TomlConfig>,
    ) -> Result<UnrecognizedFailure, ConfigError> {
        let value = toml
            .and_then(|t| t.dispatch.unrecognized_failure.as_deref())
            .unwrap_or(defaults::UNRECOGNIZED_FAILURE);

        value
            .parse()
            .map_err(ConfigError::InvalidUnrecognizedFailure)
    }

    fn resolve_log_level(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Level, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let level = cli
            .log_level
            .as_deref()
            .or_else(|| toml.and_then(|t| t.log.level.as_deref()))
            .unwrap_or(defaults::LOG_LEVEL);

        parse_log_level(level)
    }

    fn resolve_timeout(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let seconds = cli
            .timeout
            .or_else(|| toml.and_then(|t| t.transport.timeout))
            .unwrap_or(defaults::TIMEOUT_SECS);

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "transport.timeout",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_secs(seconds))
    }
}

/// Files checked, in order, when no `--config` is given.
///
/// The working directory first, then the user config directory, then
/// `/etc`.
#[must_use]
pub fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(defaults::CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("phish-notifier").join("config.toml"));
    }
    candidates.push(PathBuf::from("/etc/phish-notifier/config.toml"));
    candidates
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

fn build_slack(section: &SlackSection, shared: &Shared<'_>) -> Result<SlackSettings, ConfigError> {
    let webhook = required(
        section.webhook.as_deref(),
        field::SLACK_WEBHOOK,
        "Set slack.webhook to the incoming webhook URL",
    )?;
    let channel = required(
        section.bot_channel.as_deref(),
        field::SLACK_CHANNEL,
        "Set slack.bot_channel in config file",
    )?;

    Ok(SlackSettings {
        webhook: parse_url(field::SLACK_WEBHOOK, webhook)?,
        channel: channel.to_string(),
        username: section
            .bot_username
            .clone()
            .unwrap_or_else(|| defaults::BOT_USERNAME.to_string()),
        icon_emoji: section
            .bot_emoji
            .clone()
            .unwrap_or_else(|| defaults::BOT_EMOJI.to_string()),
        options: ChatOptions {
            redact: shared.redact || section.disable_credentials,
            base_url: shared.base_url.map(str::to_string),
            ip_query_base: shared.ip_query_base.map(str::to_string),
        },
    })
}

fn build_email(section: &EmailSection, shared: &Shared<'_>) -> Result<EmailSettings, ConfigError> {
    const HINT: &str = "The email profile requires sender, sender_password, recipient, host and host_addr";

    let sender = required(section.sender.as_deref(), field::EMAIL_SENDER, HINT)?;
    let sender_password = required(
        section.sender_password.as_deref(),
        field::EMAIL_PASSWORD,
        HINT,
    )?;
    let recipient = required(section.recipient.as_deref(), field::EMAIL_RECIPIENT, HINT)?;
    let host = required(section.host.as_deref(), field::EMAIL_HOST, HINT)?;
    let host_addr = required(section.host_addr.as_deref(), field::EMAIL_HOST_ADDR, HINT)?;

    validate_address(field::EMAIL_SENDER, sender)?;
    validate_address(field::EMAIL_RECIPIENT, recipient)?;
    if split_host_addr(host_addr).is_none() {
        return Err(ConfigError::InvalidHostAddr(host_addr.to_string()));
    }

    let mut overrides = HashMap::with_capacity(section.templates.len());
    for (name, template) in &section.templates {
        let kind = EventKind::from_str(name).map_err(|e| ConfigError::UnknownEvent(e.0))?;
        overrides.insert(kind, template.clone());
    }

    let subject_prefix = section
        .subject_prefix
        .as_deref()
        .unwrap_or(email_defaults::SUBJECT_PREFIX);
    let templates = EmailTemplates::new(subject_prefix, &overrides)?;

    Ok(EmailSettings {
        sender: sender.to_string(),
        sender_password: sender_password.to_string(),
        recipient: recipient.to_string(),
        host: host.to_string(),
        host_addr: host_addr.to_string(),
        redact: shared.redact || section.disable_credentials,
        templates,
    })
}

fn build_ghostwriter(
    section: &GhostwriterSection,
    shared: &Shared<'_>,
) -> Result<GhostwriterSettings, ConfigError> {
    const HINT: &str = "The ghostwriter profile requires graphql_endpoint, api_key and oplog_id";

    let endpoint = required(
        section.graphql_endpoint.as_deref(),
        field::GHOSTWRITER_ENDPOINT,
        HINT,
    )?;
    let api_key = required(section.api_key.as_deref(), field::GHOSTWRITER_API_KEY, HINT)?;
    let oplog_id = section
        .oplog_id
        .ok_or_else(|| ConfigError::missing(field::GHOSTWRITER_OPLOG_ID, HINT))?;

    HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
        ConfigError::InvalidHeaderValue {
            name: "Authorization".to_string(),
            reason: e.to_string(),
        }
    })?;

    Ok(GhostwriterSettings {
        endpoint: parse_url(field::GHOSTWRITER_ENDPOINT, endpoint)?,
        api_key: api_key.to_string(),
        oplog_id,
        query: section
            .query
            .clone()
            .filter(|q| !q.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MUTATION.to_string()),
        redact: shared.redact || section.disable_credentials,
        accept_invalid_certs: section.ignore_self_signed_certificate,
    })
}

// Helper functions

fn required<'a>(
    value: Option<&'a str>,
    field: &'static str,
    hint: &'static str,
) -> Result<&'a str, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::missing(field, hint))
}

fn parse_url(field: &'static str, url: &str) -> Result<Url, ConfigError> {
    Url::parse(url).map_err(|e| ConfigError::InvalidUrl {
        field,
        url: url.to_string(),
        reason: e.to_string(),
    })
}

fn validate_address(field: &'static str, address: &str) -> Result<(), ConfigError> {
    address
        .parse::<lettre::message::Mailbox>()
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidEmailAddress {
            field,
            address: address.to_string(),
            reason: e.to_string(),
        })
}

fn parse_log_level(s: &str) -> Result<Level, ConfigError> {
    match s.trim().to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
    }
}
