//! Error types for configuration parsing and validation.

use std::path::PathBuf;

use thiserror::Error;

use crate::render::RenderError;

/// Error type for configuration operations.
///
/// Covers errors from parsing, validation, and file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read config file '{}': {source}", path.display())]
    FileRead {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write configuration file (for init command).
    #[error("Failed to write config file '{}': {source}", path.display())]
    FileWrite {
        /// Path to the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Missing required field that must be provided by CLI or config file.
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired {
        /// Name of the missing field
        field: &'static str,
        /// Hint for how to provide the value
        hint: &'static str,
    },

    /// Invalid URL provided.
    #[error("Invalid URL for {field} '{url}': {reason}")]
    InvalidUrl {
        /// Name of the field
        field: &'static str,
        /// The invalid URL string
        url: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Invalid duration value (zero).
    #[error("Invalid duration for {field}: {reason}")]
    InvalidDuration {
        /// Name of the field
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Webhook path does not start with `/`.
    #[error("Invalid webhook path '{0}': must start with '/'")]
    InvalidWebhookPath(String),

    /// The profile list is empty.
    #[error("No notification profiles configured")]
    NoProfiles,

    /// Unknown profile name.
    #[error("Unknown profile '{0}': expected slack, email or ghostwriter")]
    UnknownProfile(String),

    /// Unknown event name.
    #[error(
        "Unknown event '{0}': expected email_error, email_sent, email_opened, \
         clicked_link, submitted_data or email_reported"
    )]
    UnknownEvent(String),

    /// Invalid log level.
    #[error("Invalid log level '{0}': expected trace, debug, info, warn or error")]
    InvalidLogLevel(String),

    /// Invalid value for `dispatch.unrecognized_failure`.
    #[error("Invalid unrecognized_failure '{0}': expected drop or report_as_error")]
    InvalidUnrecognizedFailure(String),

    /// Invalid email template (Handlebars syntax error).
    #[error(transparent)]
    InvalidTemplate(#[from] RenderError),

    /// Invalid email address.
    #[error("Invalid email address for {field} '{address}': {reason}")]
    InvalidEmailAddress {
        /// Name of the field
        field: &'static str,
        /// The invalid address
        address: String,
        /// Reason for invalidity
        reason: String,
    },

    /// SMTP server address is not `host:port`.
    #[error("Invalid SMTP server address '{0}': expected host:port")]
    InvalidHostAddr(String),

    /// Invalid header value.
    #[error("Invalid header value for '{name}': {reason}")]
    InvalidHeaderValue {
        /// The header name
        name: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Well-known field names for `MissingRequired` errors.
///
/// Use these constants for compile-time safety when matching field names.
pub mod field {
    /// The webhook secret.
    pub const SECRET: &str = "server.secret";
    /// The Slack incoming webhook URL.
    pub const SLACK_WEBHOOK: &str = "slack.webhook";
    /// The Slack channel.
    pub const SLACK_CHANNEL: &str = "slack.bot_channel";
    /// The email sender.
    pub const EMAIL_SENDER: &str = "email.sender";
    /// The email sender password.
    pub const EMAIL_PASSWORD: &str = "email.sender_password";
    /// The email recipient.
    pub const EMAIL_RECIPIENT: &str = "email.recipient";
    /// The SMTP server name.
    pub const EMAIL_HOST: &str = "email.host";
    /// The SMTP server address.
    pub const EMAIL_HOST_ADDR: &str = "email.host_addr";
    /// The Ghostwriter GraphQL endpoint.
    pub const GHOSTWRITER_ENDPOINT: &str = "ghostwriter.graphql_endpoint";
    /// The Ghostwriter API key.
    pub const GHOSTWRITER_API_KEY: &str = "ghostwriter.api_key";
    /// The Ghostwriter oplog ID.
    pub const GHOSTWRITER_OPLOG_ID: &str = "ghostwriter.oplog_id";
}

impl ConfigError {
    /// Creates a `MissingRequired` error for a required field.
    #[must_use]
    pub const fn missing(field: &'static str, hint: &'static str) -> Self {
        Self::MissingRequired { field, hint }
    }
}
