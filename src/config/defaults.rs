//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

/// Default listen address.
pub const LISTEN_HOST: &str = "0.0.0.0";

/// Default listen port.
pub const LISTEN_PORT: u16 = 9999;

/// Default webhook path.
pub const WEBHOOK_PATH: &str = "/webhook";

/// Destinations used when none are configured.
pub const PROFILES: &[&str] = &["slack"];

/// Default IP lookup prefix.
pub const IP_QUERY_BASE: &str = "https://whatismyipaddress.com/ip/";

/// Default Slack bot name.
pub const BOT_USERNAME: &str = "PhishBot";

/// Default Slack bot icon.
pub const BOT_EMOJI: &str = ":blowfish:";

/// Default log level.
pub const LOG_LEVEL: &str = "info";

/// Default outbound request timeout in seconds.
pub const TIMEOUT_SECS: u64 = 10;

/// Default handling of failed events with an unknown tag.
pub const UNRECOGNIZED_FAILURE: &str = "drop";

/// Config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "phish-notifier.toml";
