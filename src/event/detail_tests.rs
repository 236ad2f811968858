//! Tests for detail decoding.

use super::{EventDetail, ParseError};

#[test]
fn extracts_first_values() {
    let detail = EventDetail::parse(
        br#"{
            "payload": {
                "id": ["42", "43"],
                "username": ["alice"],
                "password": ["hunter2"],
                "__original_url": ["https://login.example.com"]
            },
            "browser": {"address": "1.2.3.4", "user-agent": "curl/8"}
        }"#,
    )
    .unwrap();

    assert_eq!(detail.id(), "42");
    assert_eq!(detail.username(), "alice");
    assert_eq!(detail.password(), "hunter2");
    assert_eq!(detail.address(), "1.2.3.4");
    assert_eq!(detail.user_agent(), "curl/8");
}

#[test]
fn missing_id_is_empty_not_error() {
    let detail = EventDetail::parse(br#"{"payload":{},"browser":{}}"#).unwrap();

    assert_eq!(detail.id(), "");
    assert_eq!(detail.username(), "");
    assert_eq!(detail.password(), "");
    assert_eq!(detail.address(), "");
    assert_eq!(detail.user_agent(), "");
}

#[test]
fn empty_id_list_is_empty() {
    let detail = EventDetail::parse(br#"{"payload":{"id":[]}}"#).unwrap();
    assert_eq!(detail.id(), "");
}

#[test]
fn missing_sections_default() {
    let detail = EventDetail::parse(b"{}").unwrap();
    assert_eq!(detail, EventDetail::default());
}

#[test]
fn scalar_id_is_shape_error() {
    let result = EventDetail::parse(br#"{"payload":{"id":"42"}}"#);
    assert!(matches!(result, Err(ParseError::Detail(_))));
}

#[test]
fn non_string_address_is_shape_error() {
    let result = EventDetail::parse(br#"{"browser":{"address":1234}}"#);
    assert!(matches!(result, Err(ParseError::Detail(_))));
}

#[test]
fn malformed_json_is_error() {
    let result = EventDetail::parse(b"{\"payload\":");
    assert!(matches!(result, Err(ParseError::Detail(_))));
}

#[test]
fn empty_blob_is_error() {
    let result = EventDetail::parse(b"");
    assert!(matches!(result, Err(ParseError::Detail(_))));
}
