//! Reply validation and textual rendering of policy values.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use brownout_core::protocol::value::{admission_decision, PolicyValue};
use brownout_core::PolicyError;

#[test]
fn decision_reads_first_element_only() {
    let reply = [PolicyValue::Bool(true), PolicyValue::Text("ignored".into())];
    assert!(admission_decision(&reply).unwrap());

    let reply = [PolicyValue::Bool(false)];
    assert!(!admission_decision(&reply).unwrap());
}

#[test]
fn decision_rejects_non_boolean_first_element() {
    let cases = [
        vec![PolicyValue::Int(1)],
        vec![PolicyValue::None, PolicyValue::Bool(true)],
        vec![PolicyValue::Text("True".into())],
        vec![],
    ];
    for reply in cases {
        let err = admission_decision(&reply).expect_err("must be rejected");
        assert!(matches!(err, PolicyError::InvalidReply(_)), "reply={reply:?}");
    }
}

#[test]
fn text_forms() {
    assert_eq!(PolicyValue::Int(5).to_text().as_deref(), Some("5"));
    assert_eq!(PolicyValue::Float(5.0).to_text().as_deref(), Some("5.0"));
    assert_eq!(PolicyValue::Float(0.125).to_text().as_deref(), Some("0.125"));
    assert_eq!(PolicyValue::Bool(true).to_text().as_deref(), Some("True"));
    assert_eq!(PolicyValue::None.to_text().as_deref(), Some("None"));
    assert_eq!(PolicyValue::Text("12".into()).to_text().as_deref(), Some("12"));
    assert_eq!(PolicyValue::Opaque("ndarray".into()).to_text(), None);
}

#[test]
fn values_parse_from_tagged_json() {
    let v: Vec<PolicyValue> =
        serde_json::from_str(r#"[{"type":"bool","value":true},{"type":"int","value":3},{"type":"none"}]"#).unwrap();
    assert_eq!(v, vec![PolicyValue::Bool(true), PolicyValue::Int(3), PolicyValue::None]);
}

#[test]
fn float_text_matches_python_str() {
    let cases = [
        (5.0, "5.0"),
        (0.0001, "0.0001"),
        (0.00001, "1e-05"),
        (1.5e-7, "1.5e-07"),
        (1e15, "1000000000000000.0"),
        (1e16, "1e+16"),
        (2.5e123, "2.5e+123"),
        (-1e16, "-1e+16"),
        (f64::NAN, "nan"),
        (f64::INFINITY, "inf"),
        (f64::NEG_INFINITY, "-inf"),
    ];
    for (v, expected) in cases {
        assert_eq!(PolicyValue::Float(v).to_text().as_deref(), Some(expected), "v={v:?}");
    }
}
