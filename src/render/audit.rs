//! Ghostwriter oplog entry rendering.

use serde::Serialize;

use crate::event::{Clicked, ErrorSending, Event, Opened, Reported, Sent, Submitted};

use super::RenderAudit;

/// The oplog fields a relayed event fills in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OplogEntry {
    /// Address the request came from
    pub source_ip: String,
    /// Targeted recipient
    pub user_context: String,
    /// Tracking ID and campaign ID
    pub description: String,
    /// Browser and credential details
    pub output: String,
    /// Event tag
    pub comments: String,
}

fn recipient_entry<E: Event>(record: &E, redact: bool) -> OplogEntry {
    OplogEntry {
        source_ip: String::new(),
        user_context: user_context(record, redact),
        description: format!("Campaign ID: {}", record.campaign_id()),
        output: String::new(),
        comments: E::KIND.tag().to_string(),
    }
}

fn browser_entry<E: Event>(
    record: &E,
    id: &str,
    address: &str,
    user_agent: &str,
    redact: bool,
) -> OplogEntry {
    OplogEntry {
        source_ip: address.to_string(),
        user_context: user_context(record, redact),
        description: format!("User ID: {id}\nCampaign ID: {}", record.campaign_id()),
        output: format!("UserAgent: {user_agent}"),
        comments: E::KIND.tag().to_string(),
    }
}

fn user_context<E: Event>(record: &E, redact: bool) -> String {
    if redact {
        String::new()
    } else {
        record.email().to_string()
    }
}

impl RenderAudit for ErrorSending {
    fn render_audit(&self, redact: bool) -> OplogEntry {
        recipient_entry(self, redact)
    }
}

impl RenderAudit for Sent {
    fn render_audit(&self, redact: bool) -> OplogEntry {
        recipient_entry(self, redact)
    }
}

impl RenderAudit for Reported {
    fn render_audit(&self, redact: bool) -> OplogEntry {
        recipient_entry(self, redact)
    }
}

impl RenderAudit for Opened {
    fn render_audit(&self, redact: bool) -> OplogEntry {
        browser_entry(self, &self.id, &self.address, &self.user_agent, redact)
    }
}

impl RenderAudit for Clicked {
    fn render_audit(&self, redact: bool) -> OplogEntry {
        browser_entry(self, &self.id, &self.address, &self.user_agent, redact)
    }
}

impl RenderAudit for Submitted {
    fn render_audit(&self, redact: bool) -> OplogEntry {
        let mut entry = browser_entry(self, &self.id, &self.address, &self.user_agent, redact);
        if !redact {
            entry.output.push_str(&format!(
                "\nUsername: {}\nPassword: {}",
                self.username, self.password
            ));
        }
        entry
    }
}
