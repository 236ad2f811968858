//! Event kind taxonomy.

use std::fmt;
use std::str::FromStr;

/// One of the six campaign lifecycle events Gophish reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// The mail server rejected the phishing email.
    ErrorSending,
    /// The phishing email was sent.
    Sent,
    /// The tracking pixel was loaded.
    Opened,
    /// The tracked link was clicked.
    Clicked,
    /// The landing page form was submitted.
    Submitted,
    /// The recipient reported the email.
    Reported,
}

impl EventKind {
    /// All kinds, in campaign lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::ErrorSending,
        Self::Sent,
        Self::Opened,
        Self::Clicked,
        Self::Submitted,
        Self::Reported,
    ];

    /// The `message` tag Gophish puts in the webhook envelope.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::ErrorSending => "Error Sending Email",
            Self::Sent => "Email Sent",
            Self::Opened => "Email Opened",
            Self::Clicked => "Clicked Link",
            Self::Submitted => "Submitted Data",
            Self::Reported => "Email Reported",
        }
    }

    /// The name used for this kind in configuration files.
    #[must_use]
    pub const fn config_name(self) -> &'static str {
        match self {
            Self::ErrorSending => "email_error",
            Self::Sent => "email_sent",
            Self::Opened => "email_opened",
            Self::Clicked => "clicked_link",
            Self::Submitted => "submitted_data",
            Self::Reported => "email_reported",
        }
    }

    /// Returns true if records of this kind are built from the nested
    /// `details` blob.
    #[must_use]
    pub const fn needs_detail(self) -> bool {
        matches!(self, Self::Opened | Self::Clicked | Self::Submitted)
    }

    /// Looks up a kind by its envelope tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Error returned when parsing an unknown configuration event name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event '{0}'")]
pub struct UnknownEventName(pub String);

impl FromStr for EventKind {
    type Err = UnknownEventName;

    /// Parses a configuration name such as `clicked_link`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.config_name() == needle)
            .ok_or_else(|| UnknownEventName(s.to_string()))
    }
}

/// Classification of an envelope's `message` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTag<'a> {
    /// One of the six recognized kinds.
    Known(EventKind),
    /// Anything else Gophish (or a newer Gophish) may send.
    Unknown(&'a str),
}

impl<'a> EventTag<'a> {
    /// Classifies a raw `message` value.
    #[must_use]
    pub fn parse(message: &'a str) -> Self {
        EventKind::from_tag(message).map_or(Self::Unknown(message), Self::Known)
    }
}

/// The set of event kinds that should be relayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnabledEvents {
    mask: u8,
}

impl EnabledEvents {
    /// No kind enabled.
    #[must_use]
    pub const fn none() -> Self {
        Self { mask: 0 }
    }

    /// Every kind enabled.
    #[must_use]
    pub fn all() -> Self {
        EventKind::ALL.into_iter().collect()
    }

    /// Returns a copy with `kind` enabled.
    #[must_use]
    pub const fn with(self, kind: EventKind) -> Self {
        Self {
            mask: self.mask | Self::bit(kind),
        }
    }

    /// Returns true if `kind` is enabled.
    #[must_use]
    pub const fn contains(self, kind: EventKind) -> bool {
        self.mask & Self::bit(kind) != 0
    }

    /// Returns true if nothing is enabled.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.mask == 0
    }

    /// Iterates over the enabled kinds in lifecycle order.
    pub fn iter(self) -> impl Iterator<Item = EventKind> {
        EventKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }

    const fn bit(kind: EventKind) -> u8 {
        1 << kind as u8
    }
}

impl Default for EnabledEvents {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<EventKind> for EnabledEvents {
    fn from_iter<I: IntoIterator<Item = EventKind>>(iter: I) -> Self {
        iter.into_iter().fold(Self::none(), Self::with)
    }
}

impl fmt::Display for EnabledEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(EventKind::config_name).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
