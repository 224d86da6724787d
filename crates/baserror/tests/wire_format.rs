//! Serialized form seen by downstream sinks.
#![cfg(feature = "serde")]

use std::io;

use baserror::{with_cause, with_chain, with_system, BaseError};
use serde_json::json;

#[test]
fn only_code_and_msg_are_emitted() {
    let err = BaseError::new_code(
        "PAY402",
        "card declined",
        [
            with_system(),
            with_chain(["checkout", "charge"]),
            with_cause(io::Error::new(io::ErrorKind::Other, "gateway")),
        ],
    );

    let text = serde_json::to_string(&err).unwrap();
    assert_eq!(text, r#"{"code":"PAY402","msg":"card declined"}"#);
}

#[test]
fn uncoded_error_emits_empty_code() {
    let err = BaseError::new("plain", []);
    assert_eq!(
        serde_json::to_value(&err).unwrap(),
        json!({ "code": "", "msg": "plain" })
    );
}

#[test]
fn decoding_accepts_both_message_keys() {
    let a: BaseError = serde_json::from_value(json!({ "code": "E1", "msg": "boom" })).unwrap();
    let b: BaseError = serde_json::from_value(json!({ "code": "E1", "message": "boom" })).unwrap();

    assert_eq!(a.to_string(), "[E1] boom");
    assert_eq!(a.to_string(), b.to_string());
    assert!(a.stack().is_none());
    assert!(a.chain().is_empty());
}

#[test]
fn decoding_rejects_wrong_types() {
    let result = serde_json::from_value::<BaseError>(json!({ "code": 5, "msg": "x" }));
    assert!(result.is_err());
}
