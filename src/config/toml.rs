//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Inbound listener configuration
    #[serde(default)]
    pub server: ServerSection,

    /// Event routing configuration
    #[serde(default)]
    pub dispatch: DispatchSection,

    /// Logging configuration
    #[serde(default)]
    pub log: LogSection,

    /// Outbound transport configuration
    #[serde(default)]
    pub transport: TransportSection,

    /// Slack destination
    #[serde(default)]
    pub slack: SlackSection,

    /// Email destination
    #[serde(default)]
    pub email: EmailSection,

    /// Ghostwriter destination
    #[serde(default)]
    pub ghostwriter: GhostwriterSection,
}

/// Inbound listener section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Address to listen on
    pub listen_host: Option<String>,

    /// Port to listen on
    pub listen_port: Option<u16>,

    /// Path Gophish posts to
    pub webhook_path: Option<String>,

    /// Shared webhook secret
    pub secret: Option<String>,
}

/// Event routing section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchSection {
    /// Destinations, in delivery order
    pub profiles: Option<Vec<String>>,

    /// Event kinds to relay
    pub events: Option<Vec<String>>,

    /// Gophish admin URL
    pub base_url: Option<String>,

    /// IP lookup URL prefix
    pub ip_query_base: Option<String>,

    /// Redact recipients and credentials everywhere
    #[serde(default)]
    pub disable_credentials: bool,

    /// `drop` or `report_as_error`
    pub unrecognized_failure: Option<String>,
}

/// Logging section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    /// Log level
    pub level: Option<String>,
}

/// Outbound transport section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransportSection {
    /// Request timeout in seconds
    pub timeout: Option<u64>,
}

/// Slack section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlackSection {
    /// Incoming webhook URL
    pub webhook: Option<String>,

    /// Channel to post in
    pub bot_channel: Option<String>,

    /// Bot display name
    pub bot_username: Option<String>,

    /// Bot icon
    pub bot_emoji: Option<String>,

    /// Redact recipients and credentials in Slack
    #[serde(default)]
    pub disable_credentials: bool,
}

/// Email section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmailSection {
    /// Sender address
    pub sender: Option<String>,

    /// SMTP password
    pub sender_password: Option<String>,

    /// Recipient address
    pub recipient: Option<String>,

    /// SMTP server name
    pub host: Option<String>,

    /// SMTP server address, `host:port`
    pub host_addr: Option<String>,

    /// Subject prefix
    pub subject_prefix: Option<String>,

    /// Redact recipients and credentials in email
    #[serde(default)]
    pub disable_credentials: bool,

    /// Body templates keyed by event name
    #[serde(default)]
    pub templates: HashMap<String, String>,
}

/// Ghostwriter section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GhostwriterSection {
    /// GraphQL endpoint
    pub graphql_endpoint: Option<String>,

    /// API token
    pub api_key: Option<String>,

    /// Target oplog
    pub oplog_id: Option<i64>,

    /// Skip TLS certificate verification
    #[serde(default)]
    pub ignore_self_signed_certificate: bool,

    /// Redact recipients and credentials in oplog entries
    #[serde(default)]
    pub disable_credentials: bool,

    /// GraphQL mutation to send
    pub query: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r##"# phish-notifier configuration file

[server]
# Address and port to listen on (defaults: 0.0.0.0, 9999)
# listen_host = "0.0.0.0"
# listen_port = 9999

# Path Gophish posts webhooks to (default: /webhook)
# webhook_path = "/webhook"

# Shared secret configured for the webhook in Gophish (required)
# secret = "change-me"

[dispatch]
# Destinations, notified in this order: "slack", "email", "ghostwriter"
# Note: --profile on the command line REPLACES this list
profiles = ["slack"]

# Events to relay (default: all)
# Note: --event on the command line REPLACES this list
# events = ["email_error", "email_sent", "email_opened", "clicked_link", "submitted_data", "email_reported"]

# Gophish admin URL; adds a "Go to Campaign" button in Slack
# base_url = "https://gophish.example.com:3333"

# Prefix for IP lookup links in Slack ("" disables links)
# ip_query_base = "https://whatismyipaddress.com/ip/"

# Omit recipient addresses and submitted credentials everywhere
# disable_credentials = false

# Failed events with an unknown message: "drop" or "report_as_error"
# unrecognized_failure = "drop"

[log]
# trace, debug, info, warn or error (default: info)
# level = "info"

[transport]
# Outbound request timeout in seconds (default: 10)
# timeout = 10

[slack]
# webhook = "https://hooks.slack.com/services/..."
# bot_channel = "#phishing"
# bot_username = "PhishBot"
# bot_emoji = ":blowfish:"
# disable_credentials = false

[email]
# sender = "phishbot@example.com"
# sender_password = "..."
# recipient = "soc@example.com"
# host = "smtp.example.com"
# host_addr = "smtp.example.com:587"
# subject_prefix = "PhishBot"
# disable_credentials = false

# Handlebars body templates, keyed by event name.
# Available variables: {{id}}, {{email}}, {{address}}, {{user_agent}},
# {{username}}, {{password}}, {{campaign_id}}, {{event}}
# [email.templates]
# clicked_link = "{{email}} clicked from {{address}}"

[ghostwriter]
# graphql_endpoint = "https://ghostwriter.example.com/v1/graphql"
# api_key = "..."
# oplog_id = 1
# ignore_self_signed_certificate = false
# disable_credentials = false
# query = "mutation ..."
"##
    .to_string()
}
