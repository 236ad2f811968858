//! Slack incoming-webhook notifier.

use serde::Serialize;

use crate::event::EventRecord;
use crate::render::{Attachment, ChatOptions, RenderChat, RenderError};

use super::{HttpClient, HttpRequest, Notifier, Profile, TransportError, ensure_success};

/// Slack destination settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackSettings {
    /// Incoming webhook URL
    pub webhook: url::Url,
    /// Channel to post in
    pub channel: String,
    /// Bot display name
    pub username: String,
    /// Bot icon
    pub icon_emoji: String,
    /// Chat rendering options
    pub options: ChatOptions,
}

/// JSON body posted to the incoming webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    /// Bot display name
    pub username: String,
    /// Channel to post in
    pub channel: String,
    /// Bot icon
    pub icon_emoji: String,
    /// Exactly one attachment per event
    pub attachments: Vec<Attachment>,
}

/// Posts one attachment per event to a Slack incoming webhook.
#[derive(Debug)]
pub struct SlackNotifier<H> {
    client: H,
    settings: SlackSettings,
}

impl<H> SlackNotifier<H> {
    /// Creates a notifier sending through `client`.
    pub const fn new(client: H, settings: SlackSettings) -> Self {
        Self { client, settings }
    }
}

impl<H: HttpClient> Notifier for SlackNotifier<H> {
    type Message = ChatMessage;

    const PROFILE: Profile = Profile::Slack;

    fn render(&self, record: &EventRecord) -> Result<ChatMessage, RenderError> {
        Ok(ChatMessage {
            username: self.settings.username.clone(),
            channel: self.settings.channel.clone(),
            icon_emoji: self.settings.icon_emoji.clone(),
            attachments: vec![record.render_chat(&self.settings.options)],
        })
    }

    async fn send(&self, message: &ChatMessage) -> Result<(), TransportError> {
        let request = HttpRequest::post_json(self.settings.webhook.clone(), message)?;
        let response = self.client.request(request).await?;
        ensure_success("Slack", &response)
    }
}
