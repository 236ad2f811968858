//! Per-destination rendering of typed event records.
//!
//! Every record implements one trait per destination:
//! - [`RenderChat`] builds a Slack attachment
//! - [`RenderEmail`] renders the configured Handlebars template into a subject/body pair
//! - [`RenderAudit`] builds a Ghostwriter oplog entry
//!
//! Rendering is pure: the inputs fully determine the output. Redaction of
//! the recipient address and submitted credentials is decided by the caller
//! and passed in explicitly.

mod audit;
mod chat;
mod email;

#[cfg(test)]
mod audit_tests;
#[cfg(test)]
mod chat_tests;

use thiserror::Error;

use crate::event::{EventKind, EventRecord};

pub use audit::OplogEntry;
pub use chat::{Action, Attachment, ChatOptions, Color, Field};
pub use email::{EmailContent, EmailTemplates, TemplateContext, defaults as email_defaults};

/// Error type for rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A template failed to compile.
    #[error("Invalid email template for {}: {source}", event.config_name())]
    Compile {
        /// Event the template belongs to
        event: EventKind,
        /// Underlying Handlebars error
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    /// Template execution failed.
    #[error("Failed to render email template '{name}': {source}")]
    Template {
        /// Name of the template
        name: &'static str,
        /// Underlying Handlebars error
        #[source]
        source: Box<handlebars::RenderError>,
    },
}

/// Renders a record as a chat attachment.
pub trait RenderChat {
    /// Builds the attachment for this record.
    fn render_chat(&self, options: &ChatOptions) -> Attachment;
}

/// Renders a record as an email.
pub trait RenderEmail {
    /// Renders the template registered for this record's kind.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if template execution fails.
    fn render_email(
        &self,
        templates: &EmailTemplates,
        redact: bool,
    ) -> Result<EmailContent, RenderError>;
}

/// Renders a record as an audit log entry.
pub trait RenderAudit {
    /// Builds the oplog entry for this record.
    fn render_audit(&self, redact: bool) -> OplogEntry;
}

macro_rules! delegate {
    ($self:ident, $record:ident => $call:expr) => {
        match $self {
            EventRecord::ErrorSending($record) => $call,
            EventRecord::Sent($record) => $call,
            EventRecord::Opened($record) => $call,
            EventRecord::Clicked($record) => $call,
            EventRecord::Submitted($record) => $call,
            EventRecord::Reported($record) => $call,
        }
    };
}

impl RenderChat for EventRecord {
    fn render_chat(&self, options: &ChatOptions) -> Attachment {
        delegate!(self, record => record.render_chat(options))
    }
}

impl RenderEmail for EventRecord {
    fn render_email(
        &self,
        templates: &EmailTemplates,
        redact: bool,
    ) -> Result<EmailContent, RenderError> {
        delegate!(self, record => record.render_email(templates, redact))
    }
}

impl RenderAudit for EventRecord {
    fn render_audit(&self, redact: bool) -> OplogEntry {
        delegate!(self, record => record.render_audit(redact))
    }
}
