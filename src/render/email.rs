//! Email rendering with Handlebars templates.

use std::collections::HashMap;

use handlebars::Handlebars;
use serde::Serialize;

use crate::event::{Clicked, ErrorSending, Event, EventKind, Opened, Reported, Sent, Submitted};

use super::{RenderEmail, RenderError};

/// Built-in templates and subject text.
pub mod defaults {
    use crate::event::EventKind;

    /// Default subject prefix.
    pub const SUBJECT_PREFIX: &str = "PhishBot";

    /// Template for events that only know the recipient.
    pub const RECIPIENT_TEMPLATE: &str = "Email Address - {{email}}
Campaign ID - {{campaign_id}}";

    /// Template for opened emails.
    pub const OPENED_TEMPLATE: &str = "Email ID - {{id}}
Email Address - {{email}}
IP Address - {{address}}
User Agent - {{user_agent}}";

    /// Template for clicked links.
    pub const CLICKED_TEMPLATE: &str = "Email ID - {{id}}
Email Address - {{email}}
IP Address - {{address}}
User Agent - {{user_agent}}";

    /// Template for submitted credentials.
    pub const SUBMITTED_TEMPLATE: &str = "Email ID - {{id}}
Email Address - {{email}}
IP Address - {{address}}
User Agent - {{user_agent}}
Username - {{username}}
Password - {{password}}";

    /// Default template for `kind`.
    #[must_use]
    pub const fn template(kind: EventKind) -> &'static str {
        match kind {
            EventKind::ErrorSending | EventKind::Sent | EventKind::Reported => {
                RECIPIENT_TEMPLATE
            }
            EventKind::Opened => OPENED_TEMPLATE,
            EventKind::Clicked => CLICKED_TEMPLATE,
            EventKind::Submitted => SUBMITTED_TEMPLATE,
        }
    }

    /// Subject text following the prefix.
    #[must_use]
    pub const fn subject(kind: EventKind) -> &'static str {
        match kind {
            EventKind::ErrorSending => "Error Sending Email",
            EventKind::Sent => "Email Sent",
            EventKind::Opened => "Email Opened",
            EventKind::Clicked => "Email Clicked",
            EventKind::Submitted => "Credentials Submitted",
            EventKind::Reported => "Email Reported",
        }
    }
}

/// A rendered email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub body: String,
}

/// Variables available to email templates.
///
/// Redacted or inapplicable values are left out, so they render empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateContext<'a> {
    event: &'static str,
    campaign_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_agent: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
}

impl<'a> TemplateContext<'a> {
    /// Starts a context with the recipient, unless redacted.
    #[must_use]
    pub fn new<E: Event>(record: &'a E, redact: bool) -> Self {
        Self {
            event: E::KIND.tag(),
            campaign_id: record.campaign_id(),
            id: None,
            email: (!redact).then(|| record.email()),
            address: None,
            user_agent: None,
            username: None,
            password: None,
        }
    }

    /// Adds the browser fields.
    #[must_use]
    pub const fn with_browser(mut self, id: &'a str, address: &'a str, user_agent: &'a str) -> Self {
        self.id = Some(id);
        self.address = Some(address);
        self.user_agent = Some(user_agent);
        self
    }

    /// Adds the submitted credentials, unless redacted.
    #[must_use]
    pub const fn with_credentials(
        mut self,
        username: &'a str,
        password: &'a str,
        redact: bool,
    ) -> Self {
        if !redact {
            self.username = Some(username);
            self.password = Some(password);
        }
        self
    }
}

/// Compiled email templates, one per event kind.
///
/// Templates are compiled once at startup; a syntax error there is a
/// configuration error. Output is plain text, so HTML escaping is disabled.
#[derive(Debug, Clone)]
pub struct EmailTemplates {
    registry: Handlebars<'static>,
    subject_prefix: String,
}

impl EmailTemplates {
    /// Compiles the built-in templates, replacing those in `overrides`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Compile`] for the first template that fails to
    /// compile.
    pub fn new(
        subject_prefix: impl Into<String>,
        overrides: &HashMap<EventKind, String>,
    ) -> Result<Self, RenderError> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);

        for kind in EventKind::ALL {
            let source = overrides
                .get(&kind)
                .map_or(defaults::template(kind), String::as_str);
            registry
                .register_template_string(kind.config_name(), source)
                .map_err(|e| RenderError::Compile {
                    event: kind,
                    source: Box::new(e),
                })?;
        }

        Ok(Self {
            registry,
            subject_prefix: subject_prefix.into(),
        })
    }

    /// Compiles the built-in templates only.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature mirrors [`EmailTemplates::new`].
    pub fn builtin() -> Result<Self, RenderError> {
        Self::new(defaults::SUBJECT_PREFIX, &HashMap::new())
    }

    /// Subject line for `kind`.
    #[must_use]
    pub fn subject(&self, kind: EventKind) -> String {
        format!("{} - {}", self.subject_prefix, defaults::subject(kind))
    }

    /// Renders the template registered for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Template`] if template execution fails.
    pub fn render(
        &self,
        kind: EventKind,
        context: &TemplateContext<'_>,
    ) -> Result<EmailContent, RenderError> {
        let name = kind.config_name();
        let body = self
            .registry
            .render(name, context)
            .map_err(|e| RenderError::Template {
                name,
                source: Box::new(e),
            })?;

        Ok(EmailContent {
            subject: self.subject(kind),
            body,
        })
    }
}

impl RenderEmail for ErrorSending {
    fn render_email(
        &self,
        templates: &EmailTemplates,
        redact: bool,
    ) -> Result<EmailContent, RenderError> {
        templates.render(Self::KIND, &TemplateContext::new(self, redact))
    }
}

impl RenderEmail for Sent {
    fn render_email(
        &self,
        templates: &EmailTemplates,
        redact: bool,
    ) -> Result<EmailContent, RenderError> {
        templates.render(Self::KIND, &TemplateContext::new(self, redact))
    }
}

impl RenderEmail for Reported {
    fn render_email(
        &self,
        templates: &EmailTemplates,
        redact: bool,
    ) -> Result<EmailContent, RenderError> {
        templates.render(Self::KIND, &TemplateContext::new(self, redact))
    }
}

impl RenderEmail for Opened {
    fn render_email(
        &self,
        templates: &EmailTemplates,
        redact: bool,
    ) -> Result<EmailContent, RenderError> {
        let context = TemplateContext::new(self, redact).with_browser(
            &self.id,
            &self.address,
            &self.user_agent,
        );
        templates.render(Self::KIND, &context)
    }
}

impl RenderEmail for Clicked {
    fn render_email(
        &self,
        templates: &EmailTemplates,
        redact: bool,
    ) -> Result<EmailContent, RenderError> {
        let context = TemplateContext::new(self, redact).with_browser(
            &self.id,
            &self.address,
            &self.user_agent,
        );
        templates.render(Self::KIND, &context)
    }
}

impl RenderEmail for Submitted {
    fn render_email(
        &self,
        templates: &EmailTemplates,
        redact: bool,
    ) -> Result<EmailContent, RenderError> {
        let context = TemplateContext::new(self, redact)
            .with_browser(&self.id, &self.address, &self.user_agent)
            .with_credentials(&self.username, &self.password, redact);
        templates.render(Self::KIND, &context)
    }
}
