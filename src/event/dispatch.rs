//! Mapping from an envelope to a typed record.

use std::fmt;
use std::str::FromStr;

use super::{DispatchError, EnabledEvents, EventKind, EventRecord, EventTag, WebhookEnvelope};

/// What to do with a failed (`success == false`) envelope whose tag is not
/// recognized.
///
/// Gophish versions disagree on the tags they use for failures, so this is
/// an explicit configuration choice rather than a guess.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnrecognizedFailure {
    /// Treat it like any other unknown tag.
    #[default]
    Drop,
    /// Relay it as an "Error Sending Email" event.
    ReportAsError,
}

impl UnrecognizedFailure {
    /// Configuration value for this policy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Drop => "drop",
            Self::ReportAsError => "report_as_error",
        }
    }
}

impl fmt::Display for UnrecognizedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnrecognizedFailure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "drop" => Ok(Self::Drop),
            "report_as_error" => Ok(Self::ReportAsError),
            _ => Err(s.to_string()),
        }
    }
}

/// Maps an envelope to the typed record of its kind.
///
/// Returns `Ok(None)` when the kind is recognized but not enabled.
///
/// # Errors
///
/// - [`DispatchError::UnknownEventKind`] when the tag is not recognized
///   (non-fatal for the caller)
/// - [`DispatchError::Parse`] when the details of a detail-bearing kind
///   cannot be decoded
pub fn dispatch(
    envelope: &WebhookEnvelope,
    enabled: EnabledEvents,
    policy: UnrecognizedFailure,
) -> Result<Option<EventRecord>, DispatchError> {
    let kind = match EventTag::parse(&envelope.message) {
        EventTag::Known(kind) => kind,
        EventTag::Unknown(_) if !envelope.success && policy == UnrecognizedFailure::ReportAsError => {
            EventKind::ErrorSending
        }
        EventTag::Unknown(tag) => return Err(DispatchError::UnknownEventKind(tag.to_string())),
    };

    if !enabled.contains(kind) {
        return Ok(None);
    }

    Ok(Some(EventRecord::build(kind, envelope)?))
}
