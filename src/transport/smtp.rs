//! Email notifier over SMTP.

use std::future::Future;
use std::time::Duration;

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::event::EventRecord;
use crate::render::{EmailTemplates, RenderEmail, RenderError};

use super::{Notifier, Profile, TransportError};

/// Default SMTP submission port when `host_addr` has none.
const SUBMISSION_PORT: u16 = 587;

/// Port that speaks TLS from the first byte instead of upgrading.
const SMTPS_PORT: u16 = 465;

/// Email destination settings.
#[derive(Clone)]
pub struct EmailSettings {
    /// Sender address, also the SMTP username
    pub sender: String,
    /// SMTP password
    pub sender_password: String,
    /// Recipient address
    pub recipient: String,
    /// Server name used for TLS verification
    pub host: String,
    /// Address to connect to, `host:port`
    pub host_addr: String,
    /// Omit the recipient address and submitted credentials
    pub redact: bool,
    /// Compiled subject/body templates
    pub templates: EmailTemplates,
}

impl std::fmt::Debug for EmailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailSettings")
            .field("sender", &self.sender)
            .field("sender_password", &"[redacted]")
            .field("recipient", &self.recipient)
            .field("host", &self.host)
            .field("host_addr", &self.host_addr)
            .field("redact", &self.redact)
            .finish_non_exhaustive()
    }
}

/// A rendered email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Sender address
    pub from: String,
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub body: String,
}

/// Sends rendered emails.
///
/// Abstracts SMTP so [`EmailNotifier`] can be tested without a server.
pub trait Mailer: Send + Sync {
    /// Sends `message`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if an address is invalid or the SMTP
    /// exchange fails.
    fn send(&self, message: &EmailMessage)
    -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// Splits `host:port`, falling back to the submission port.
///
/// Returns `None` when the host part is empty or the port is not a number.
#[must_use]
pub fn split_host_addr(host_addr: &str) -> Option<(&str, u16)> {
    let host_addr = host_addr.trim();
    let (host, port) = match host_addr.rsplit_once(':') {
        Some((host, port)) => (host, port.parse().ok()?),
        None => (host_addr, SUBMISSION_PORT),
    };
    if host.is_empty() {
        return None;
    }
    Some((host, port))
}

/// Production [`Mailer`] using lettre's async SMTP transport.
///
/// Requires STARTTLS before authenticating as the sender; a server that does
/// not offer it is an error. Port 465 uses implicit TLS instead.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer").finish_non_exhaustive()
    }
}

impl SmtpMailer {
    /// Builds a transport for `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidHostAddr`] for a malformed
    /// `host_addr`, or [`TransportError::Smtp`] if TLS parameters cannot be
    /// built.
    pub fn new(settings: &EmailSettings, timeout: Duration) -> Result<Self, TransportError> {
        let (server, port) = split_host_addr(&settings.host_addr)
            .ok_or_else(|| TransportError::InvalidHostAddr(settings.host_addr.clone()))?;
        let params = TlsParameters::new(settings.host.clone())?;
        // Credentials never cross an unencrypted connection.
        let tls = if port == SMTPS_PORT {
            Tls::Wrapper(params)
        } else {
            Tls::Required(params)
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(server)
            .port(port)
            .tls(tls)
            .credentials(Credentials::new(
                settings.sender.clone(),
                settings.sender_password.clone(),
            ))
            .timeout(Some(timeout))
            .build();

        Ok(Self { transport })
    }
}

fn mailbox(address: &str) -> Result<Mailbox, TransportError> {
    address
        .parse()
        .map_err(|source| TransportError::Address {
            address: address.to_string(),
            source,
        })
}

impl Mailer for SmtpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), TransportError> {
        let email = Message::builder()
            .from(mailbox(&message.from)?)
            .to(mailbox(&message.to)?)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())?;

        self.transport.send(email).await?;
        Ok(())
    }
}

/// Renders events with the configured templates and mails them.
#[derive(Debug)]
pub struct EmailNotifier<M> {
    mailer: M,
    settings: EmailSettings,
}

impl<M> EmailNotifier<M> {
    /// Creates a notifier sending through `mailer`.
    pub const fn new(mailer: M, settings: EmailSettings) -> Self {
        Self { mailer, settings }
    }
}

impl<M: Mailer> Notifier for EmailNotifier<M> {
    type Message = EmailMessage;

    const PROFILE: Profile = Profile::Email;

    fn render(&self, record: &EventRecord) -> Result<EmailMessage, RenderError> {
        let content = record.render_email(&self.settings.templates, self.settings.redact)?;
        Ok(EmailMessage {
            from: self.settings.sender.clone(),
            to: self.settings.recipient.clone(),
            subject: content.subject,
            body: content.body,
        })
    }

    async fn send(&self, message: &EmailMessage) -> Result<(), TransportError> {
        self.mailer.send(message).await
    }
}
