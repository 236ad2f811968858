//! Tests for envelope decoding.

use super::{ParseError, WebhookEnvelope};

mod parse {
    use super::*;

    #[test]
    fn decodes_gophish_body() {
        let body = br#"{
            "success": true,
            "campaign_id": 7,
            "message": "Email Opened",
            "details": "{\"payload\":{\"id\":[\"9\"]},\"browser\":{\"address\":\"10.0.0.1\",\"user-agent\":\"UA\"}}",
            "email": "x@y.com"
        }"#;

        let envelope = WebhookEnvelope::parse(body).unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.campaign_id, 7);
        assert_eq!(envelope.message, "Email Opened");
        assert_eq!(envelope.email, "x@y.com");
        assert_eq!(
            envelope.details_json().as_deref(),
            Some(r#"{"payload":{"id":["9"]},"browser":{"address":"10.0.0.1","user-agent":"UA"}}"#)
        );
    }

    #[test]
    fn optional_fields_default() {
        let envelope = WebhookEnvelope::parse(br#"{"message":"Email Sent"}"#).unwrap();

        assert!(!envelope.success);
        assert_eq!(envelope.campaign_id, 0);
        assert_eq!(envelope.email, "");
        assert!(envelope.details_json().is_none());
    }

    #[test]
    fn null_details_is_absent() {
        let envelope =
            WebhookEnvelope::parse(br#"{"message":"Email Sent","details":null}"#).unwrap();
        assert!(envelope.details_json().is_none());
    }

    #[test]
    fn inline_object_details_are_accepted() {
        let envelope = WebhookEnvelope::parse(
            br#"{"message":"Clicked Link","details":{"payload":{"id":["1"]}}}"#,
        )
        .unwrap();

        assert_eq!(
            envelope.details_json().as_deref(),
            Some(r#"{"payload":{"id":["1"]}}"#)
        );
    }

    #[test]
    fn malformed_json_is_error() {
        let result = WebhookEnvelope::parse(b"{not json");
        assert!(matches!(result, Err(ParseError::Envelope(_))));
    }

    #[test]
    fn wrong_field_type_is_error() {
        let result =
            WebhookEnvelope::parse(br#"{"message":"Email Sent","campaign_id":"seven"}"#);
        assert!(matches!(result, Err(ParseError::Envelope(_))));
    }

    #[test]
    fn success_as_string_is_error() {
        let result = WebhookEnvelope::parse(br#"{"message":"Email Sent","success":"true"}"#);
        assert!(matches!(result, Err(ParseError::Envelope(_))));
    }

    #[test]
    fn missing_message_is_error() {
        let result = WebhookEnvelope::parse(br#"{"success":true,"campaign_id":1}"#);
        assert!(matches!(result, Err(ParseError::Envelope(_))));
    }

    #[test]
    fn negative_campaign_id_is_error() {
        let result = WebhookEnvelope::parse(br#"{"message":"Email Sent","campaign_id":-1}"#);
        assert!(matches!(result, Err(ParseError::Envelope(_))));
    }
}

mod new {
    use super::*;

    #[test]
    fn builds_envelope_with_string_details() {
        let envelope = WebhookEnvelope::new(true, 3, "Clicked Link", Some("{}"), "a@b.com");

        assert_eq!(envelope.campaign_id, 3);
        assert_eq!(envelope.details_json().as_deref(), Some("{}"));
    }
}
