//! Tests for chat rendering.

use crate::event::{
    Clicked, ErrorSending, EventKind, EventRecord, Opened, Reported, Sent, Submitted,
};

use super::{Attachment, ChatOptions, Color, RenderChat};

fn opened() -> Opened {
    Opened {
        campaign_id: 7,
        id: "9".to_string(),
        email: "x@y.com".to_string(),
        address: "10.0.0.1".to_string(),
        user_agent: "UA".to_string(),
    }
}

fn submitted() -> Submitted {
    Submitted {
        campaign_id: 3,
        id: "42".to_string(),
        email: "a@b.com".to_string(),
        address: "1.2.3.4".to_string(),
        user_agent: "curl/8".to_string(),
        username: "alice".to_string(),
        password: "hunter2".to_string(),
    }
}

fn titles(attachment: &Attachment) -> Vec<&str> {
    attachment.fields.iter().map(|f| f.title.as_str()).collect()
}

fn plain() -> ChatOptions {
    ChatOptions::default()
}

fn redacted() -> ChatOptions {
    ChatOptions {
        redact: true,
        ..ChatOptions::default()
    }
}

mod opened_scenario {
    use super::*;

    #[test]
    fn yellow_attachment_with_browser_fields() {
        let attachment = opened().render_chat(&plain());

        assert_eq!(attachment.title, "Email Opened");
        assert_eq!(attachment.color, "#ffff00");
        assert_eq!(titles(&attachment), vec!["ID", "Address", "User Agent", "Email"]);
        assert_eq!(attachment.field("ID"), Some("9"));
        assert_eq!(attachment.field("Address"), Some("10.0.0.1"));
        assert_eq!(attachment.field("User Agent"), Some("UA"));
        assert_eq!(attachment.field("Email"), Some("x@y.com"));
        assert!(attachment.actions.is_empty());
    }

    #[test]
    fn email_dropped_when_redacted() {
        let attachment = opened().render_chat(&redacted());
        assert_eq!(titles(&attachment), vec!["ID", "Address", "User Agent"]);
    }
}

mod submitted_redaction {
    use super::*;

    #[test]
    fn redacted_has_no_sensitive_fields() {
        let attachment = submitted().render_chat(&redacted());

        assert_eq!(attachment.color, Color::Red.hex());
        for title in ["Email", "Username", "Password"] {
            assert!(attachment.field(title).is_none(), "{title} leaked");
        }
        let json = serde_json::to_string(&attachment).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(!json.contains("alice"));
        assert!(!json.contains("a@b.com"));
    }

    #[test]
    fn unredacted_has_values_verbatim() {
        let attachment = submitted().render_chat(&plain());

        assert_eq!(
            titles(&attachment),
            vec!["ID", "Address", "User Agent", "Email", "Username", "Password"]
        );
        assert_eq!(attachment.field("Email"), Some("a@b.com"));
        assert_eq!(attachment.field("Username"), Some("alice"));
        assert_eq!(attachment.field("Password"), Some("hunter2"));
    }
}

mod recipient_only_kinds {
    use super::*;

    fn records() -> Vec<EventRecord> {
        vec![
            EventRecord::ErrorSending(ErrorSending {
                campaign_id: 1,
                email: "v@x.com".to_string(),
            }),
            EventRecord::Sent(Sent {
                campaign_id: 1,
                email: "v@x.com".to_string(),
            }),
            EventRecord::Reported(Reported {
                campaign_id: 1,
                email: "v@x.com".to_string(),
            }),
        ]
    }

    #[test]
    fn orange_with_email_only() {
        for record in records() {
            let attachment = record.render_chat(&plain());
            assert_eq!(attachment.title, record.kind().tag());
            assert_eq!(attachment.color, "#ffa500");
            assert_eq!(titles(&attachment), vec!["Email"]);
        }
    }

    #[test]
    fn redaction_leaves_no_fields() {
        for record in records() {
            let attachment = record.render_chat(&redacted());
            assert!(attachment.fields.is_empty());
        }
    }
}

mod options {
    use super::*;

    #[test]
    fn campaign_button_added_for_base_url() {
        let options = ChatOptions {
            base_url: Some("https://phish.example.com/".to_string()),
            ..ChatOptions::default()
        };

        let attachment = opened().render_chat(&options);

        assert_eq!(attachment.actions.len(), 1);
        let action = &attachment.actions[0];
        assert_eq!(action.kind, "button");
        assert_eq!(action.text, "Go to Campaign");
        assert_eq!(action.url, "https://phish.example.com/campaigns/7");
        assert_eq!(action.style, "primary");
    }

    #[test]
    fn empty_base_url_adds_no_button() {
        let options = ChatOptions {
            base_url: Some(String::new()),
            ..ChatOptions::default()
        };
        assert!(opened().render_chat(&options).actions.is_empty());
    }

    #[test]
    fn address_linked_to_lookup_service() {
        let options = ChatOptions {
            ip_query_base: Some("https://whatismyipaddress.com/ip/".to_string()),
            ..ChatOptions::default()
        };

        let attachment = opened().render_chat(&options);

        assert_eq!(
            attachment.field("Address"),
            Some("<https://whatismyipaddress.com/ip/10.0.0.1|10.0.0.1>")
        );
    }

    #[test]
    fn empty_address_is_not_linked() {
        let options = ChatOptions {
            ip_query_base: Some("https://lookup/".to_string()),
            ..ChatOptions::default()
        };
        assert_eq!(options.format_address(""), "");
    }
}

mod purity {
    use super::*;

    #[test]
    fn rendering_twice_is_identical() {
        let options = ChatOptions {
            redact: false,
            base_url: Some("https://phish".to_string()),
            ip_query_base: Some("https://lookup/".to_string()),
        };
        let record = EventRecord::Clicked(Clicked {
            campaign_id: 2,
            id: "1".to_string(),
            email: "e@x".to_string(),
            address: "8.8.8.8".to_string(),
            user_agent: "UA".to_string(),
        });

        let first = serde_json::to_vec(&record.render_chat(&options)).unwrap();
        let second = serde_json::to_vec(&record.render_chat(&options)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn colors_follow_severity() {
        assert_eq!(Color::for_kind(EventKind::Submitted), Color::Red);
        assert_eq!(Color::for_kind(EventKind::Opened), Color::Yellow);
        for kind in [
            EventKind::Clicked,
            EventKind::ErrorSending,
            EventKind::Reported,
            EventKind::Sent,
        ] {
            assert_eq!(Color::for_kind(kind), Color::Orange);
        }
    }
}

mod wire_format {
    use super::*;

    #[test]
    fn serializes_slack_shape() {
        let options = ChatOptions {
            base_url: Some("https://phish".to_string()),
            ..redacted()
        };
        let value = serde_json::to_value(
            Sent {
                campaign_id: 5,
                email: "v@x.com".to_string(),
            }
            .render_chat(&options),
        )
        .unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "title": "Email Sent",
                "color": "#ffa500",
                "actions": [{
                    "type": "button",
                    "text": "Go to Campaign",
                    "url": "https://phish/campaigns/5",
                    "style": "primary"
                }]
            })
        );
    }
}
