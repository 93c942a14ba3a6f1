//! Helpers for reading loosely-typed JSON request bodies

use serde_json::{Map, Value};

use crate::errors::ServiceError;

/// Requires the body to be a JSON object
pub fn require_object(payload: &Value) -> Result<&Map<String, Value>, ServiceError> {
    payload
        .as_object()
        .ok_or_else(|| ServiceError::BadRequest("Request body must be a JSON object".to_string()))
}

/// Renders a scalar as text the way a form field would be read.
///
/// Strings are returned as-is, numbers and booleans in their JSON spelling.
/// `null`, arrays and objects have no text form.
pub fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// A field counts as present when the key exists and is not `null`
pub fn field<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    object.get(name).filter(|value| !value.is_null())
}

/// Text of an optional field, empty when absent
pub fn text_or_empty(object: &Map<String, Value>, name: &str) -> String {
    field(object, name).and_then(json_text).unwrap_or_default()
}

/// Exactly six ASCII digits, as used for UPI PINs and card OTPs
pub fn is_six_digit_code(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
}
