//! Fan-out of one event record to the configured destinations.

use std::fmt;

use thiserror::Error;

use crate::event::EventRecord;
use crate::render::RenderError;
use crate::transport::{
    EmailNotifier, GhostwriterNotifier, Notifier, Profile, ReqwestClient, SlackNotifier,
    SmtpMailer, TransportError,
};

#[cfg(test)]
#[path = "relay_tests.rs"]
mod tests;

/// Why a destination did not receive an event.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The message could not be rendered.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The message was rendered but could not be delivered.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Outcome of delivering one event to every destination.
///
/// Entries appear in delivery order.
#[derive(Debug, Default)]
pub struct DeliveryReport {
    outcomes: Vec<(Profile, Result<(), DeliveryError>)>,
}

impl DeliveryReport {
    /// Per-destination outcomes, in delivery order.
    #[must_use]
    pub fn outcomes(&self) -> &[(Profile, Result<(), DeliveryError>)] {
        &self.outcomes
    }

    /// Outcome for `profile`, if it was attempted.
    #[must_use]
    pub fn outcome(&self, profile: Profile) -> Option<&Result<(), DeliveryError>> {
        self.outcomes
            .iter()
            .find(|(p, _)| *p == profile)
            .map(|(_, result)| result)
    }

    /// Number of destinations that received the event.
    #[must_use]
    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|(_, r)| r.is_ok()).count()
    }

    /// Number of destinations that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.delivered()
    }

    /// Returns true if no destination failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

impl fmt::Display for DeliveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} destinations delivered",
            self.delivered(),
            self.outcomes.len()
        )
    }
}

/// Renders and sends records to each configured destination.
///
/// Destinations are tried in the order they were added. Each gets exactly one
/// attempt; a failure is logged and recorded without affecting the others.
#[derive(Debug)]
pub struct Relay<H = ReqwestClient, M = SmtpMailer> {
    order: Vec<Profile>,
    slack: Option<SlackNotifier<H>>,
    email: Option<EmailNotifier<M>>,
    ghostwriter: Option<GhostwriterNotifier<H>>,
    dry_run: bool,
}

impl<H, M> Default for Relay<H, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H, M> Relay<H, M> {
    /// Creates a relay with no destinations.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            order: Vec::new(),
            slack: None,
            email: None,
            ghostwriter: None,
            dry_run: false,
        }
    }

    /// Adds the Slack destination.
    #[must_use]
    pub fn with_slack(mut self, notifier: SlackNotifier<H>) -> Self {
        self.slack = Some(notifier);
        self.add(Profile::Slack)
    }

    /// Adds the email destination.
    #[must_use]
    pub fn with_email(mut self, notifier: EmailNotifier<M>) -> Self {
        self.email = Some(notifier);
        self.add(Profile::Email)
    }

    /// Adds the Ghostwriter destination.
    #[must_use]
    pub fn with_ghostwriter(mut self, notifier: GhostwriterNotifier<H>) -> Self {
        self.ghostwriter = Some(notifier);
        self.add(Profile::Ghostwriter)
    }

    /// Renders and logs messages without sending them.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Destinations in delivery order.
    #[must_use]
    pub fn profiles(&self) -> &[Profile] {
        &self.order
    }

    /// Returns true if messages are only rendered.
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn add(mut self, profile: Profile) -> Self {
        if !self.order.contains(&profile) {
            self.order.push(profile);
        }
        self
    }
}

impl<H, M> Relay<H, M>
where
    SlackNotifier<H>: Notifier,
    EmailNotifier<M>: Notifier,
    GhostwriterNotifier<H>: Notifier,
{
    /// Delivers `record` to every destination.
    pub async fn deliver(&self, record: &EventRecord) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for &profile in &self.order {
            let result = match profile {
                Profile::Slack => self.attempt(self.slack.as_ref(), record).await,
                Profile::Email => self.attempt(self.email.as_ref(), record).await,
                Profile::Ghostwriter => self.attempt(self.ghostwriter.as_ref(), record).await,
            };

            match &result {
                Ok(()) => tracing::debug!(
                    "{profile}: delivered {} for campaign {}",
                    record.kind(),
                    record.campaign_id()
                ),
                Err(e) => tracing::error!(
                    "{profile}: failed to deliver {} for campaign {}: {e}",
                    record.kind(),
                    record.campaign_id()
                ),
            }
            report.outcomes.push((profile, result));
        }

        report
    }

    async fn attempt<N: Notifier>(
        &self,
        notifier: Option<&N>,
        record: &EventRecord,
    ) -> Result<(), DeliveryError> {
        let Some(notifier) = notifier else {
            return Ok(());
        };

        let message = notifier.render(record)?;
        if self.dry_run {
            tracing::info!("{}: dry run, not sending {message:?}", N::PROFILE);
            return Ok(());
        }

        notifier.send(&message).await?;
        Ok(())
    }
}
