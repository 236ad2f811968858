//! Slack attachment rendering.

use serde::Serialize;

use crate::event::{Clicked, ErrorSending, Event, EventKind, Opened, Reported, Sent, Submitted};

use super::RenderChat;

/// Attachment color, keyed to event severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Credentials were submitted.
    Red,
    /// Link clicked, email sent, send error or report.
    Orange,
    /// Email opened.
    Yellow,
}

impl Color {
    /// Color for an event kind.
    #[must_use]
    pub const fn for_kind(kind: EventKind) -> Self {
        match kind {
            EventKind::Submitted => Self::Red,
            EventKind::Opened => Self::Yellow,
            EventKind::ErrorSending
            | EventKind::Sent
            | EventKind::Clicked
            | EventKind::Reported => Self::Orange,
        }
    }

    /// Hex value sent to Slack.
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Red => "#f05b4f",
            Self::Orange => "#ffa500",
            Self::Yellow => "#ffff00",
        }
    }
}

/// A Slack message attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    /// Attachment title (the event tag)
    pub title: String,
    /// Hex color
    pub color: String,
    /// Labeled values
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
    /// Buttons
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
}

/// A labeled value inside an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Label
    pub title: String,
    /// Value
    pub value: String,
    /// Whether Slack may lay the field out side by side
    pub short: bool,
}

/// A button inside an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    /// Action type, always `button`
    #[serde(rename = "type")]
    pub kind: String,
    /// Button label
    pub text: String,
    /// Target URL
    pub url: String,
    /// Button style
    pub style: String,
}

/// Settings that shape chat output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatOptions {
    /// Omit the recipient address and submitted credentials
    pub redact: bool,
    /// Gophish admin URL; adds a "Go to Campaign" button when set
    pub base_url: Option<String>,
    /// IP lookup URL prefix; addresses become links when set
    pub ip_query_base: Option<String>,
}

impl ChatOptions {
    /// Formats an address, linking it to the lookup service when configured.
    #[must_use]
    pub fn format_address(&self, address: &str) -> String {
        match self.ip_query_base.as_deref() {
            Some(base) if !base.is_empty() && !address.is_empty() => {
                format!("<{base}{address}|{address}>")
            }
            _ => address.to_string(),
        }
    }

    /// Builds the campaign dashboard button, if a base URL is configured.
    #[must_use]
    pub fn campaign_button(&self, campaign_id: u64) -> Option<Action> {
        let base = self.base_url.as_deref()?.trim_end_matches('/');
        if base.is_empty() {
            return None;
        }
        Some(Action {
            kind: "button".to_string(),
            text: "Go to Campaign".to_string(),
            url: format!("{base}/campaigns/{campaign_id}"),
            style: "primary".to_string(),
        })
    }
}

impl Attachment {
    /// Starts an attachment titled and colored for `kind`.
    #[must_use]
    pub fn for_kind(kind: EventKind) -> Self {
        Self {
            title: kind.tag().to_string(),
            color: Color::for_kind(kind).hex().to_string(),
            fields: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn with_field(mut self, title: &str, value: &str) -> Self {
        self.fields.push(Field {
            title: title.to_string(),
            value: value.to_string(),
            short: false,
        });
        self
    }

    /// Appends an action, if any.
    #[must_use]
    pub fn with_action(mut self, action: Option<Action>) -> Self {
        self.actions.extend(action);
        self
    }

    /// Returns the value of the first field with `title`.
    #[must_use]
    pub fn field(&self, title: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.title == title)
            .map(|f| f.value.as_str())
    }
}

/// Attachment for kinds that only know the recipient.
fn recipient_attachment<E: Event>(record: &E, options: &ChatOptions) -> Attachment {
    let mut attachment = Attachment::for_kind(E::KIND);
    if !options.redact {
        attachment = attachment.with_field("Email", record.email());
    }
    attachment.with_action(options.campaign_button(record.campaign_id()))
}

/// Attachment head for kinds reported from a browser.
fn browser_attachment(
    kind: EventKind,
    id: &str,
    address: &str,
    user_agent: &str,
    options: &ChatOptions,
) -> Attachment {
    Attachment::for_kind(kind)
        .with_field("ID", id)
        .with_field("Address", &options.format_address(address))
        .with_field("User Agent", user_agent)
}

impl RenderChat for ErrorSending {
    fn render_chat(&self, options: &ChatOptions) -> Attachment {
        recipient_attachment(self, options)
    }
}

impl RenderChat for Sent {
    fn render_chat(&self, options: &ChatOptions) -> Attachment {
        recipient_attachment(self, options)
    }
}

impl RenderChat for Reported {
    fn render_chat(&self, options: &ChatOptions) -> Attachment {
        recipient_attachment(self, options)
    }
}

impl RenderChat for Opened {
    fn render_chat(&self, options: &ChatOptions) -> Attachment {
        let mut attachment = browser_attachment(
            Self::KIND,
            &self.id,
            &self.address,
            &self.user_agent,
            options,
        );
        if !options.redact {
            attachment = attachment.with_field("Email", &self.email);
        }
        attachment.with_action(options.campaign_button(self.campaign_id))
    }
}

impl RenderChat for Clicked {
    fn render_chat(&self, options: &ChatOptions) -> Attachment {
        let mut attachment = browser_attachment(
            Self::KIND,
            &self.id,
            &self.address,
            &self.user_agent,
            options,
        );
        if !options.redact {
            attachment = attachment.with_field("Email", &self.email);
        }
        attachment.with_action(options.campaign_button(self.campaign_id))
    }
}

impl RenderChat for Submitted {
    fn render_chat(&self, options: &ChatOptions) -> Attachment {
        let mut attachment = browser_attachment(
            Self::KIND,
            &self.id,
            &self.address,
            &self.user_agent,
            options,
        );
        if !options.redact {
            attachment = attachment
                .with_field("Email", &self.email)
                .with_field("Username", &self.username)
                .with_field("Password", &self.password);
        }
        attachment.with_action(options.campaign_button(self.campaign_id))
    }
}
