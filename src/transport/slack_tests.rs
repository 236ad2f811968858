//! Tests for `SlackNotifier`.

use super::mock::MockClient;
use super::{Notifier, SlackNotifier, SlackSettings, TransportError};
use crate::event::{EventRecord, Submitted};
use crate::render::ChatOptions;

fn settings(options: ChatOptions) -> SlackSettings {
    SlackSettings {
        webhook: url::Url::parse("https://hooks.slack.test/services/T/B/X").unwrap(),
        channel: "#phishing".to_string(),
        username: "PhishBot".to_string(),
        icon_emoji: ":blowfish:".to_string(),
        options,
    }
}

fn submitted() -> EventRecord {
    EventRecord::Submitted(Submitted {
        campaign_id: 3,
        id: "42".to_string(),
        email: "a@b.com".to_string(),
        address: "1.2.3.4".to_string(),
        user_agent: "curl/8".to_string(),
        username: "alice".to_string(),
        password: "hunter2".to_string(),
    })
}

#[test]
fn render_wraps_single_attachment() {
    let notifier = SlackNotifier::new(MockClient::ok(), settings(ChatOptions::default()));

    let message = notifier.render(&submitted()).unwrap();

    assert_eq!(message.username, "PhishBot");
    assert_eq!(message.channel, "#phishing");
    assert_eq!(message.icon_emoji, ":blowfish:");
    assert_eq!(message.attachments.len(), 1);
    assert_eq!(message.attachments[0].title, "Submitted Data");
    assert_eq!(message.attachments[0].field("Password"), Some("hunter2"));
}

#[test]
fn render_honors_redaction() {
    let options = ChatOptions {
        redact: true,
        ..ChatOptions::default()
    };
    let notifier = SlackNotifier::new(MockClient::ok(), settings(options));

    let message = notifier.render(&submitted()).unwrap();

    assert_eq!(message.attachments[0].field("Password"), None);
    assert_eq!(message.attachments[0].field("Email"), None);
}

#[tokio::test]
async fn send_posts_payload_to_webhook() {
    let client = MockClient::ok();
    let notifier = SlackNotifier::new(client.clone(), settings(ChatOptions::default()));
    let message = notifier.render(&submitted()).unwrap();

    notifier.send(&message).await.unwrap();

    let requests = client.captured_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, http::Method::POST);
    assert_eq!(requests[0].url.path(), "/services/T/B/X");

    let body = client.json_body(0);
    assert_eq!(body["channel"], "#phishing");
    assert_eq!(body["icon_emoji"], ":blowfish:");
    assert_eq!(body["attachments"][0]["color"], "#f05b4f");
    assert_eq!(body["attachments"][0]["fields"][0]["title"], "ID");
}

#[tokio::test]
async fn non_success_status_is_error() {
    let client = MockClient::status(403, "invalid_token");
    let notifier = SlackNotifier::new(client, settings(ChatOptions::default()));
    let message = notifier.render(&submitted()).unwrap();

    let err = notifier.send(&message).await.unwrap_err();

    assert!(matches!(err, TransportError::Status { service: "Slack", .. }));
}

#[tokio::test]
async fn connection_failure_is_error() {
    let notifier = SlackNotifier::new(MockClient::failing(), settings(ChatOptions::default()));
    let message = notifier.render(&submitted()).unwrap();

    let err = notifier.send(&message).await.unwrap_err();

    assert!(matches!(err, TransportError::Http(_)));
}
