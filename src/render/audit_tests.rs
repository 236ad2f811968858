//! Tests for audit log rendering.

use crate::event::{Clicked, ErrorSending, EventRecord, Submitted};

use super::{OplogEntry, RenderAudit};

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

#[test]
fn clicked_entry() {
    let record = Clicked {
        campaign_id: 9,
        id: "r1".to_string(),
        email: "e@x.com".to_string(),
        address: "8.8.8.8".to_string(),
        user_agent: "UA".to_string(),
    };

    assert_eq!(
        record.render_audit(false),
        OplogEntry {
            source_ip: "8.8.8.8".to_string(),
            user_context: "e@x.com".to_string(),
            description: "User ID: r1\nCampaign ID: 9".to_string(),
            output: "UserAgent: UA".to_string(),
            comments: "Clicked Link".to_string(),
        }
    );
}

#[test]
fn submitted_entry_includes_credentials() {
    let entry = submitted().render_audit(false);

    assert_eq!(
        entry.output,
        "UserAgent: curl/8\nUsername: alice\nPassword: hunter2"
    );
    assert_eq!(entry.comments, "Submitted Data");
}

#[test]
fn submitted_entry_redacted() {
    let entry = submitted().render_audit(true);

    assert_eq!(entry.output, "UserAgent: curl/8");
    assert_eq!(entry.user_context, "");
    assert_eq!(entry.source_ip, "1.2.3.4");
}

#[test]
fn recipient_only_entry() {
    let record = EventRecord::ErrorSending(ErrorSending {
        campaign_id: 4,
        email: "v@x.com".to_string(),
    });

    assert_eq!(
        record.render_audit(false),
        OplogEntry {
            source_ip: String::new(),
            user_context: "v@x.com".to_string(),
            description: "Campaign ID: 4".to_string(),
            output: String::new(),
            comments: "Error Sending Email".to_string(),
        }
    );
}

#[test]
fn serializes_camel_case() {
    let value = serde_json::to_value(submitted().render_audit(true)).unwrap();

    assert!(value.get("sourceIp").is_some());
    assert!(value.get("userContext").is_some());
    assert!(value.get("source_ip").is_none());
}

#[test]
fn rendering_twice_is_identical() {
    let record = EventRecord::Submitted(submitted());
    assert_eq!(record.render_audit(false), record.render_audit(false));
}
