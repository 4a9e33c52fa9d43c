//! Decoding of raw bus payloads.
//!
//! A payload is a JSON array of records shaped like
//! `{"user_id": "<identity>", "data": <any JSON value>}`. The `data` value is
//! captured as a raw span of the input and forwarded byte-for-byte.

use crate::error::Error;
use crate::Event;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::value::RawValue;

#[derive(Deserialize)]
struct Record<'a> {
    user_id: String,
    #[serde(borrow)]
    data: &'a RawValue,
}

/// Decodes one raw bus payload into its events, preserving record order.
///
/// Decoding is all-or-nothing: a single malformed record fails the whole
/// payload and no events are returned.
pub fn decode(raw: &str) -> Result<Vec<Event>, Error> {
    let records: Vec<Record<'_>> = serde_json::from_str(raw)?;

    Ok(records
        .into_iter()
        .map(|record| Event {
            target_identity: record.user_id,
            payload: Bytes::copy_from_slice(record.data.get().as_bytes()),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn decodes_single_record() {
        let events = decode(r#"[{"user_id":"1","data":{}}]"#).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].target_identity, "1");
        assert_eq!(events[0].payload, Bytes::from_static(b"{}"));
    }

    #[test]
    fn preserves_record_order() {
        let events =
            decode(r#"[{"user_id":"2","data":{}},{"user_id":"3","data":{"some":20}}]"#).unwrap();

        let targets: Vec<&str> = events.iter().map(|e| e.target_identity.as_str()).collect();
        assert_eq!(targets, vec!["2", "3"]);
        assert_eq!(events[1].payload, Bytes::from_static(br#"{"some":20}"#));
    }

    #[test]
    fn forwards_data_exactly_as_received() {
        // Key order, whitespace and number formatting must survive untouched.
        let raw = r#"[{"user_id":"7","data": {"z": 1.50, "a" : [true, null]} }]"#;
        let events = decode(raw).unwrap();

        assert_eq!(
            events[0].payload,
            Bytes::from_static(br#"{"z": 1.50, "a" : [true, null]}"#)
        );
    }

    #[test]
    fn accepts_scalar_data() {
        let events = decode(r#"[{"user_id":"1","data":"hello"},{"user_id":"1","data":3}]"#)
            .unwrap();

        assert_eq!(events[0].payload, Bytes::from_static(br#""hello""#));
        assert_eq!(events[1].payload, Bytes::from_static(b"3"));
    }

    #[test]
    fn empty_array_yields_no_events() {
        assert!(decode("[]").unwrap().is_empty());
    }

    #[test]
    fn one_malformed_record_fails_the_whole_payload() {
        let err = decode(r#"[{"user_id":"1","data":{}},{INVALID}]"#).unwrap_err();
        assert_eq!(err.error_kind, ErrorKind::Decode);
    }

    #[test]
    fn rejects_truncated_json() {
        let err = decode("[}").unwrap_err();
        assert_eq!(err.error_kind, ErrorKind::Decode);
    }

    #[test]
    fn rejects_record_missing_data() {
        let err = decode(r#"[{"user_id":"1"}]"#).unwrap_err();
        assert_eq!(err.error_kind, ErrorKind::Decode);
    }

    #[test]
    fn rejects_non_string_user_id() {
        let err = decode(r#"[{"user_id":1,"data":{}}]"#).unwrap_err();
        assert_eq!(err.error_kind, ErrorKind::Decode);
    }

    #[test]
    fn rejects_non_array_payload() {
        let err = decode(r#"{"user_id":"1","data":{}}"#).unwrap_err();
        assert_eq!(err.error_kind, ErrorKind::Decode);
    }
}
