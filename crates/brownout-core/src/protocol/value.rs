//! Dynamic values returned by a policy.
//!
//! A policy implemented behind a foreign binding cannot be trusted to return
//! well-typed data, so replies cross the boundary as `PolicyValue`s and are
//! validated on the bridge side.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PolicyError, PolicyResult};

/// A single value handed back by a policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PolicyValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// A value with no textual form; carries its type name for diagnostics.
    Opaque(String),
}

impl PolicyValue {
    /// Textual form, or `None` if the value cannot be rendered as text.
    pub fn to_text(&self) -> Option<String> {
        match self {
            PolicyValue::Opaque(_) => None,
            other => Some(other.to_string()),
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            PolicyValue::None => "none",
            PolicyValue::Bool(_) => "bool",
            PolicyValue::Int(_) => "int",
            PolicyValue::Float(_) => "float",
            PolicyValue::Text(_) => "text",
            PolicyValue::Opaque(name) => name.as_str(),
        }
    }
}

impl fmt::Display for PolicyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyValue::None => f.write_str("None"),
            PolicyValue::Bool(true) => f.write_str("True"),
            PolicyValue::Bool(false) => f.write_str("False"),
            PolicyValue::Int(v) => write!(f, "{v}"),
            PolicyValue::Float(v) => f.write_str(&float_text(*v)),
            PolicyValue::Text(s) => f.write_str(s),
            PolicyValue::Opaque(name) => write!(f, "<{name}>"),
        }
    }
}

/// Float text in the form a Python policy's `str()` produces.
///
/// Same shortest round-trip digits and exponent thresholds as `{:?}`, but the
/// exponent carries a sign and at least two digits (`1e+16`, `1.5e-05`) and
/// non-finite values are `nan`, `inf`, `-inf`.
fn float_text(v: f64) -> String {
    if v.is_nan() {
        return "nan".into();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf".into() } else { "-inf".into() };
    }

    let s = format!("{v:?}");
    let Some((mantissa, exp)) = s.split_once('e') else {
        return s;
    };
    let (sign, digits) = match exp.strip_prefix('-') {
        Some(d) => ('-', d),
        None => ('+', exp),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

/// Extract the admission decision from a `withOptional` reply.
///
/// The first element must be a boolean; anything after it is ignored.
pub fn admission_decision(reply: &[PolicyValue]) -> PolicyResult<bool> {
    match reply.first() {
        Some(PolicyValue::Bool(b)) => Ok(*b),
        Some(other) => Err(PolicyError::InvalidReply(format!(
            "withOptional returned {} in first position (expected bool)",
            other.type_name()
        ))),
        None => Err(PolicyError::InvalidReply("withOptional returned an empty reply".into())),
    }
}
