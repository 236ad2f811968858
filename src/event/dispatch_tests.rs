//! Tests for the dispatcher.

use super::{
    DispatchError, EnabledEvents, EventKind, EventRecord, Opened, ParseError,
    UnrecognizedFailure, WebhookEnvelope, dispatch,
};

const OPENED_DETAILS: &str =
    r#"{"payload":{"id":["9"]},"browser":{"address":"10.0.0.1","user-agent":"UA"}}"#;

mod known_kinds {
    use super::*;

    #[test]
    fn opened_scenario() {
        let body = br#"{"success":true,"campaign_id":7,"message":"Email Opened","email":"x@y.com","details":"{\"payload\":{\"id\":[\"9\"]},\"browser\":{\"address\":\"10.0.0.1\",\"user-agent\":\"UA\"}}"}"#;
        let envelope = WebhookEnvelope::parse(body).unwrap();
        let enabled = EnabledEvents::none().with(EventKind::Opened);

        let record = dispatch(&envelope, enabled, UnrecognizedFailure::Drop)
            .unwrap()
            .unwrap();

        assert_eq!(
            record,
            EventRecord::Opened(Opened {
                campaign_id: 7,
                id: "9".to_string(),
                email: "x@y.com".to_string(),
                address: "10.0.0.1".to_string(),
                user_agent: "UA".to_string(),
            })
        );
    }

    #[test]
    fn every_enabled_kind_dispatches_to_its_record() {
        for kind in EventKind::ALL {
            let envelope = WebhookEnvelope::new(true, 1, kind.tag(), Some(OPENED_DETAILS), "e@x");
            let record = dispatch(&envelope, EnabledEvents::all(), UnrecognizedFailure::Drop)
                .unwrap()
                .unwrap();
            assert_eq!(record.kind(), kind);
        }
    }

    #[test]
    fn disabled_kind_is_silent_noop() {
        let envelope = WebhookEnvelope::new(true, 1, "Email Opened", Some(OPENED_DETAILS), "e@x");
        let enabled = EnabledEvents::none().with(EventKind::Clicked);

        let result = dispatch(&envelope, enabled, UnrecognizedFailure::Drop).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn disabled_kind_never_parses_details() {
        let envelope = WebhookEnvelope::new(true, 1, "Clicked Link", Some("garbage"), "e@x");

        let result =
            dispatch(&envelope, EnabledEvents::none(), UnrecognizedFailure::Drop).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn malformed_details_surface_parse_error() {
        let envelope = WebhookEnvelope::new(true, 1, "Submitted Data", Some("garbage"), "e@x");

        let result = dispatch(&envelope, EnabledEvents::all(), UnrecognizedFailure::Drop);
        assert!(matches!(
            result,
            Err(DispatchError::Parse(ParseError::Detail(_)))
        ));
    }
}

mod unknown_kinds {
    use super::*;

    #[test]
    fn unknown_tag_is_reported() {
        let envelope = WebhookEnvelope::new(true, 1, "Campaign Created", None, "");

        let result = dispatch(&envelope, EnabledEvents::all(), UnrecognizedFailure::Drop);
        assert!(matches!(
            result,
            Err(DispatchError::UnknownEventKind(ref tag)) if tag == "Campaign Created"
        ));
    }

    #[test]
    fn unknown_tags_never_panic() {
        for tag in ["", " ", "email opened", "Clicked Link!", "\u{0}", "💥"] {
            for success in [true, false] {
                let envelope = WebhookEnvelope::new(success, 0, tag, None, "");
                let result = dispatch(&envelope, EnabledEvents::all(), UnrecognizedFailure::Drop);
                assert!(matches!(result, Err(DispatchError::UnknownEventKind(_))));
            }
        }
    }

    #[test]
    fn failed_unknown_is_dropped_by_default() {
        let envelope = WebhookEnvelope::new(false, 4, "SMTP Failure", None, "v@x.com");

        let result = dispatch(&envelope, EnabledEvents::all(), UnrecognizedFailure::Drop);
        assert!(matches!(result, Err(DispatchError::UnknownEventKind(_))));
    }

    #[test]
    fn failed_unknown_can_be_reported_as_error() {
        let envelope = WebhookEnvelope::new(false, 4, "SMTP Failure", None, "v@x.com");

        let record = dispatch(
            &envelope,
            EnabledEvents::all(),
            UnrecognizedFailure::ReportAsError,
        )
        .unwrap()
        .unwrap();

        assert_eq!(record.kind(), EventKind::ErrorSending);
        assert_eq!(record.campaign_id(), 4);
        assert_eq!(record.email(), "v@x.com");
    }

    #[test]
    fn reported_as_error_respects_enabled_set() {
        let envelope = WebhookEnvelope::new(false, 4, "SMTP Failure", None, "v@x.com");
        let enabled = EnabledEvents::none().with(EventKind::Clicked);

        let result = dispatch(&envelope, enabled, UnrecognizedFailure::ReportAsError).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn successful_unknown_is_not_reported_as_error() {
        let envelope = WebhookEnvelope::new(true, 4, "Campaign Completed", None, "");

        let result = dispatch(
            &envelope,
            EnabledEvents::all(),
            UnrecognizedFailure::ReportAsError,
        );
        assert!(matches!(result, Err(DispatchError::UnknownEventKind(_))));
    }
}

mod policy_parsing {
    use super::*;

    #[test]
    fn parses_config_values() {
        assert_eq!("drop".parse(), Ok(UnrecognizedFailure::Drop));
        assert_eq!(
            "report_as_error".parse(),
            Ok(UnrecognizedFailure::ReportAsError)
        );
        assert_eq!(
            " Report_As_Error ".parse(),
            Ok(UnrecognizedFailure::ReportAsError)
        );
        assert_eq!(
            "retry".parse::<UnrecognizedFailure>(),
            Err("retry".to_string())
        );
    }

    #[test]
    fn only_documented_values_are_accepted() {
        assert_eq!(
            "error".parse::<UnrecognizedFailure>(),
            Err("error".to_string())
        );
    }

    #[test]
    fn display_round_trips() {
        for policy in [UnrecognizedFailure::Drop, UnrecognizedFailure::ReportAsError] {
            assert_eq!(policy.to_string().parse(), Ok(policy));
        }
    }
}
