//! Top-level webhook envelope.

use std::borrow::Cow;

use serde::Deserialize;

use super::ParseError;

/// The JSON body Gophish posts for every campaign event.
///
/// More information about the fields:
/// <https://github.com/gophish/gophish/blob/master/models/result.go>
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebhookEnvelope {
    /// False for failure events such as a rejected send
    #[serde(default)]
    pub success: bool,

    /// Campaign the event belongs to
    #[serde(default)]
    pub campaign_id: u64,

    /// Event tag, e.g. `"Clicked Link"`
    pub message: String,

    /// Nested event details, kept raw until a kind needs them
    #[serde(default)]
    details: Option<serde_json::Value>,

    /// Recipient address
    #[serde(default)]
    pub email: String,
}

impl WebhookEnvelope {
    /// Decodes an envelope from the raw request body.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Envelope`] for malformed JSON or wrong field types.
    pub fn parse(body: &[u8]) -> Result<Self, ParseError> {
        serde_json::from_slice(body).map_err(ParseError::Envelope)
    }

    /// Builds an envelope directly, mainly for tests and tooling.
    #[must_use]
    pub fn new(
        success: bool,
        campaign_id: u64,
        message: impl Into<String>,
        details: Option<&str>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            success,
            campaign_id,
            message: message.into(),
            details: details.map(|d| serde_json::Value::String(d.to_string())),
            email: email.into(),
        }
    }

    /// Returns the raw JSON of the `details` field, if any.
    ///
    /// Gophish sends details as a string containing JSON; an inline JSON
    /// object is accepted as well. `null` counts as absent.
    #[must_use]
    pub fn details_json(&self) -> Option<Cow<'_, str>> {
        match self.details.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(raw) => Some(Cow::Borrowed(raw.as_str())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}
