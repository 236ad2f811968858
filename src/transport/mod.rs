//! Delivery of rendered events to external destinations.
//!
//! This module provides:
//! - HTTP request/response types and the [`HttpClient`] abstraction
//! - Production HTTP client implementation ([`ReqwestClient`])
//! - The [`Notifier`] trait and one implementation per [`Profile`]:
//!   [`SlackNotifier`], [`EmailNotifier`], [`GhostwriterNotifier`]
//! - The [`Mailer`] abstraction over SMTP ([`SmtpMailer`])

mod client;
mod error;
mod ghostwriter;
mod http;
mod slack;
mod smtp;

#[cfg(test)]
pub(crate) mod mock;
#[cfg(test)]
mod slack_tests;

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use crate::event::EventRecord;
use crate::render::RenderError;

pub use client::ReqwestClient;
pub use error::{HttpError, TransportError};
pub use ghostwriter::{
    DEFAULT_MUTATION, GhostwriterNotifier, GhostwriterSettings, GraphqlRequest, OplogVariables,
};
pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use slack::{ChatMessage, SlackNotifier, SlackSettings};
pub use smtp::{EmailMessage, EmailNotifier, EmailSettings, Mailer, SmtpMailer, split_host_addr};

/// A notification destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Profile {
    /// Slack incoming webhook
    Slack,
    /// SMTP email
    Email,
    /// Ghostwriter oplog via GraphQL
    Ghostwriter,
}

impl Profile {
    /// All profiles.
    pub const ALL: [Self; 3] = [Self::Slack, Self::Email, Self::Ghostwriter];

    /// Name used in configuration and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Slack => "slack",
            Self::Email => "email",
            Self::Ghostwriter => "ghostwriter",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| s.to_string())
    }
}

/// A destination that can render and deliver event records.
///
/// Rendering and sending are split so that a dry run can render without
/// touching the network.
pub trait Notifier: Send + Sync {
    /// The fully rendered message sent to the destination.
    type Message: fmt::Debug + Send + Sync;

    /// Which profile this notifier serves.
    const PROFILE: Profile;

    /// Renders `record` into a destination message.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if a template fails to execute.
    fn render(&self, record: &EventRecord) -> Result<Self::Message, RenderError>;

    /// Delivers a rendered message.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the destination cannot be reached or
    /// rejects the message.
    fn send(&self, message: &Self::Message)
    -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// Maps a non-2xx response to [`TransportError::Status`].
fn ensure_success(service: &'static str, response: &HttpResponse) -> Result<(), TransportError> {
    if response.is_success() {
        return Ok(());
    }
    Err(TransportError::Status {
        service,
        status: response.status,
        body: response
            .body_text()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_string),
    })
}
