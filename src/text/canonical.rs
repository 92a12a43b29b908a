//! JSON validation and canonical pretty-printing
//!
//! The canonical form is what the visual surface's changes are written back
//! as: indentation normalized to a fixed width, member order preserved, no
//! trailing newline. Re-canonicalizing canonical text yields the same text.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::errors::SyncError;

/// Syntactic JSON check; GeoJSON semantics are not validated
pub fn validate_json(text: &str) -> Result<(), SyncError> {
    serde_json::from_str::<serde::de::IgnoredAny>(text)?;
    Ok(())
}

/// Parse a JSON object payload and pretty-print it with `indent` spaces
pub fn canonicalize(payload: &str, indent: usize) -> Result<String, SyncError> {
    let value: Value = serde_json::from_str(payload)?;
    if !value.is_object() {
        return Err(SyncError::MalformedDocument(format!(
            "expected a JSON object, found {}",
            value_kind(&value)
        )));
    }
    to_canonical_string(&value, indent)
}

/// Serialize any value in the canonical pretty-printed form
pub fn to_canonical_string<T: Serialize>(value: &T, indent: usize) -> Result<String, SyncError> {
    let indent = " ".repeat(indent);
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only ever writes valid UTF-8
    String::from_utf8(out).map_err(|e| SyncError::MalformedDocument(e.to_string()))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
