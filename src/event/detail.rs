//! Nested event details for opened, clicked and submitted events.

use serde::Deserialize;

use super::ParseError;

/// Decoded `details` blob.
///
/// Gophish serializes the landing page form as URL-encoded values (every
/// key maps to a list) and the browser as a flat string map. Only the keys
/// the records need are decoded; their shapes are checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventDetail {
    /// Form values captured by the landing page
    #[serde(default)]
    pub payload: FormValues,

    /// Information about the requesting browser
    #[serde(default)]
    pub browser: BrowserInfo,
}

/// The form values relevant to the records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FormValues {
    /// Tracking ID
    #[serde(default)]
    pub id: Option<Vec<String>>,

    /// Submitted username
    #[serde(default)]
    pub username: Option<Vec<String>>,

    /// Submitted password
    #[serde(default)]
    pub password: Option<Vec<String>>,
}

/// The browser details relevant to the records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BrowserInfo {
    /// Source IP address
    #[serde(default)]
    pub address: Option<String>,

    /// User-Agent header
    #[serde(default, rename = "user-agent")]
    pub user_agent: Option<String>,
}

impl EventDetail {
    /// Decodes the details blob.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Detail`] for malformed JSON or wrong shapes.
    pub fn parse(raw: &[u8]) -> Result<Self, ParseError> {
        serde_json::from_slice(raw).map_err(ParseError::Detail)
    }

    /// Tracking ID, or `""` when absent.
    #[must_use]
    pub fn id(&self) -> &str {
        first(self.payload.id.as_deref())
    }

    /// Submitted username, or `""` when absent.
    #[must_use]
    pub fn username(&self) -> &str {
        first(self.payload.username.as_deref())
    }

    /// Submitted password, or `""` when absent.
    #[must_use]
    pub fn password(&self) -> &str {
        first(self.payload.password.as_deref())
    }

    /// Source address, or `""` when absent.
    #[must_use]
    pub fn address(&self) -> &str {
        self.browser.address.as_deref().unwrap_or_default()
    }

    /// User agent, or `""` when absent.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        self.browser.user_agent.as_deref().unwrap_or_default()
    }
}

fn first(values: Option<&[String]>) -> &str {
    values
        .and_then(<[String]>::first)
        .map_or("", String::as_str)
}
