//! Typed event records, one per event kind.
//!
//! Each record holds exactly the fields relevant to its kind and is
//! immutable once built. Rendering for each destination lives in
//! [`crate::render`].

use super::{EventDetail, EventKind, ParseError, WebhookEnvelope};

/// Fields shared by every record.
pub trait Event {
    /// The kind this record represents.
    const KIND: EventKind;

    /// Campaign the event belongs to.
    fn campaign_id(&self) -> u64;

    /// Recipient address.
    fn email(&self) -> &str;
}

/// The mail server rejected the phishing email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSending {
    /// Campaign ID
    pub campaign_id: u64,
    /// Recipient address
    pub email: String,
}

/// The phishing email was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    /// Campaign ID
    pub campaign_id: u64,
    /// Recipient address
    pub email: String,
}

/// The recipient reported the email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reported {
    /// Campaign ID
    pub campaign_id: u64,
    /// Recipient address
    pub email: String,
}

/// The tracking pixel was loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opened {
    /// Campaign ID
    pub campaign_id: u64,
    /// Tracking ID
    pub id: String,
    /// Recipient address
    pub email: String,
    /// Source IP address
    pub address: String,
    /// Browser user agent
    pub user_agent: String,
}

/// The tracked link was clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clicked {
    /// Campaign ID
    pub campaign_id: u64,
    /// Tracking ID
    pub id: String,
    /// Recipient address
    pub email: String,
    /// Source IP address
    pub address: String,
    /// Browser user agent
    pub user_agent: String,
}

/// The landing page form was submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    /// Campaign ID
    pub campaign_id: u64,
    /// Tracking ID
    pub id: String,
    /// Recipient address
    pub email: String,
    /// Source IP address
    pub address: String,
    /// Browser user agent
    pub user_agent: String,
    /// Submitted username
    pub username: String,
    /// Submitted password
    pub password: String,
}

impl ErrorSending {
    /// Builds the record from an envelope.
    #[must_use]
    pub fn new(envelope: &WebhookEnvelope) -> Self {
        Self {
            campaign_id: envelope.campaign_id,
            email: envelope.email.clone(),
        }
    }
}

impl Sent {
    /// Builds the record from an envelope.
    #[must_use]
    pub fn new(envelope: &WebhookEnvelope) -> Self {
        Self {
            campaign_id: envelope.campaign_id,
            email: envelope.email.clone(),
        }
    }
}

impl Reported {
    /// Builds the record from an envelope.
    #[must_use]
    pub fn new(envelope: &WebhookEnvelope) -> Self {
        Self {
            campaign_id: envelope.campaign_id,
            email: envelope.email.clone(),
        }
    }
}

impl Opened {
    /// Builds the record from an envelope and its decoded details.
    #[must_use]
    pub fn new(envelope: &WebhookEnvelope, detail: &EventDetail) -> Self {
        Self {
            campaign_id: envelope.campaign_id,
            id: detail.id().to_string(),
            email: envelope.email.clone(),
            address: detail.address().to_string(),
            user_agent: detail.user_agent().to_string(),
        }
    }
}

impl Clicked {
    /// Builds the record from an envelope and its decoded details.
    #[must_use]
    pub fn new(envelope: &WebhookEnvelope, detail: &EventDetail) -> Self {
        Self {
            campaign_id: envelope.campaign_id,
            id: detail.id().to_string(),
            email: envelope.email.clone(),
            address: detail.address().to_string(),
            user_agent: detail.user_agent().to_string(),
        }
    }
}

impl Submitted {
    /// Builds the record from an envelope and its decoded details.
    #[must_use]
    pub fn new(envelope: &WebhookEnvelope, detail: &EventDetail) -> Self {
        Self {
            campaign_id: envelope.campaign_id,
            id: detail.id().to_string(),
            email: envelope.email.clone(),
            address: detail.address().to_string(),
            user_agent: detail.user_agent().to_string(),
            username: detail.username().to_string(),
            password: detail.password().to_string(),
        }
    }
}

macro_rules! impl_event {
    ($($ty:ident => $kind:ident),* $(,)?) => {
        $(
            impl Event for $ty {
                const KIND: EventKind = EventKind::$kind;

                fn campaign_id(&self) -> u64 {
                    self.campaign_id
                }

                fn email(&self) -> &str {
                    &self.email
                }
            }
        )*
    };
}

impl_event! {
    ErrorSending => ErrorSending,
    Sent => Sent,
    Opened => Opened,
    Clicked => Clicked,
    Submitted => Submitted,
    Reported => Reported,
}

/// A typed record of any kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventRecord {
    /// See [`ErrorSending`]
    ErrorSending(ErrorSending),
    /// See [`Sent`]
    Sent(Sent),
    /// See [`Opened`]
    Opened(Opened),
    /// See [`Clicked`]
    Clicked(Clicked),
    /// See [`Submitted`]
    Submitted(Submitted),
    /// See [`Reported`]
    Reported(Reported),
}

impl EventRecord {
    /// Builds the record of `kind` from an envelope.
    ///
    /// The `details` blob is decoded only for kinds that need it.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if a detail-bearing kind has missing or
    /// malformed details.
    pub fn build(kind: EventKind, envelope: &WebhookEnvelope) -> Result<Self, ParseError> {
        let details = if kind.needs_detail() {
            detail(kind, envelope)?
        } else {
            EventDetail::default()
        };

        let record = match kind {
            EventKind::ErrorSending => Self::ErrorSending(ErrorSending::new(envelope)),
            EventKind::Sent => Self::Sent(Sent::new(envelope)),
            EventKind::Reported => Self::Reported(Reported::new(envelope)),
            EventKind::Opened => Self::Opened(Opened::new(envelope, &details)),
            EventKind::Clicked => Self::Clicked(Clicked::new(envelope, &details)),
            EventKind::Submitted => Self::Submitted(Submitted::new(envelope, &details)),
        };
        Ok(record)
    }

    /// The kind of this record.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::ErrorSending(_) => EventKind::ErrorSending,
            Self::Sent(_) => EventKind::Sent,
            Self::Opened(_) => EventKind::Opened,
            Self::Clicked(_) => EventKind::Clicked,
            Self::Submitted(_) => EventKind::Submitted,
            Self::Reported(_) => EventKind::Reported,
        }
    }

    /// Campaign the event belongs to.
    #[must_use]
    pub fn campaign_id(&self) -> u64 {
        match self {
            Self::ErrorSending(r) => r.campaign_id(),
            Self::Sent(r) => r.campaign_id(),
            Self::Opened(r) => r.campaign_id(),
            Self::Clicked(r) => r.campaign_id(),
            Self::Submitted(r) => r.campaign_id(),
            Self::Reported(r) => r.campaign_id(),
        }
    }

    /// Recipient address.
    #[must_use]
    pub fn email(&self) -> &str {
        match self {
            Self::ErrorSending(r) => r.email(),
            Self::Sent(r) => r.email(),
            Self::Opened(r) => r.email(),
            Self::Clicked(r) => r.email(),
            Self::Submitted(r) => r.email(),
            Self::Reported(r) => r.email(),
        }
    }
}

fn detail(kind: EventKind, envelope: &WebhookEnvelope) -> Result<EventDetail, ParseError> {
    let raw = envelope
        .details_json()
        .ok_or(ParseError::MissingDetails { kind })?;
    EventDetail::parse(raw.as_bytes())
}
