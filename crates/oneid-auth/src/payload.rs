//! Helpers for reading raw provider payloads.

use crate::error::{AuthError, AuthResult};
use serde_json::{Map, Value};

/// Require a raw payload to be present and map-like.
///
/// `None` and JSON `null` are both treated as absent.
pub(crate) fn require_object<'a>(
    name: &str,
    raw: Option<&'a Value>,
) -> AuthResult<&'a Map<String, Value>> {
    match raw {
        None | Some(Value::Null) => Err(AuthError::invalid_argument(name, "payload is absent")),
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(AuthError::invalid_argument(name, "payload is not an object")),
    }
}

/// Textual form of a raw value.
///
/// Strings are taken verbatim, numbers and booleans use their display form,
/// arrays and objects are rendered as compact JSON. `null` has no text.
pub(crate) fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
