//! Tests for the event taxonomy.

use super::kind::{EnabledEvents, EventKind, EventTag};

mod event_kind {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_tag(kind.tag()), Some(kind));
        }
    }

    #[test]
    fn config_names_parse() {
        for kind in EventKind::ALL {
            assert_eq!(kind.config_name().parse::<EventKind>(), Ok(kind));
        }
    }

    #[test]
    fn config_names_are_case_insensitive() {
        assert_eq!(
            " Clicked_Link ".parse::<EventKind>(),
            Ok(EventKind::Clicked)
        );
    }

    #[test]
    fn unknown_config_name_is_error() {
        let err = "link_clicked".parse::<EventKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown event 'link_clicked'");
    }

    #[test]
    fn tag_lookup_is_exact() {
        assert_eq!(EventKind::from_tag("email opened"), None);
        assert_eq!(EventKind::from_tag("Email Opened "), None);
    }

    #[test]
    fn only_browser_kinds_need_detail() {
        let needing: Vec<_> = EventKind::ALL
            .into_iter()
            .filter(|k| k.needs_detail())
            .collect();
        assert_eq!(
            needing,
            vec![EventKind::Opened, EventKind::Clicked, EventKind::Submitted]
        );
    }

    #[test]
    fn display_is_tag() {
        assert_eq!(EventKind::Submitted.to_string(), "Submitted Data");
    }
}

mod event_tag {
    use super::*;

    #[test]
    fn known_tag() {
        assert_eq!(
            EventTag::parse("Email Reported"),
            EventTag::Known(EventKind::Reported)
        );
    }

    #[test]
    fn unknown_tag_keeps_text() {
        assert_eq!(
            EventTag::parse("Campaign Created"),
            EventTag::Unknown("Campaign Created")
        );
    }
}

mod enabled_events {
    use super::*;

    #[test]
    fn default_enables_everything() {
        let enabled = EnabledEvents::default();
        assert!(EventKind::ALL.into_iter().all(|k| enabled.contains(k)));
    }

    #[test]
    fn none_enables_nothing() {
        let enabled = EnabledEvents::none();
        assert!(enabled.is_empty());
        assert!(EventKind::ALL.into_iter().all(|k| !enabled.contains(k)));
    }

    #[test]
    fn collect_from_kinds() {
        let enabled: EnabledEvents = [EventKind::Clicked, EventKind::Submitted]
            .into_iter()
            .collect();

        assert!(enabled.contains(EventKind::Clicked));
        assert!(enabled.contains(EventKind::Submitted));
        assert!(!enabled.contains(EventKind::Opened));
        assert_eq!(
            enabled.iter().collect::<Vec<_>>(),
            vec![EventKind::Clicked, EventKind::Submitted]
        );
    }

    #[test]
    fn display_lists_config_names() {
        let enabled = EnabledEvents::none()
            .with(EventKind::Opened)
            .with(EventKind::Sent);
        assert_eq!(enabled.to_string(), "[email_sent, email_opened]");
    }
}
