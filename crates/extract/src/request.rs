// ABOUTME: Wire-format request validation for {"html": "..."} payloads.
// ABOUTME: Rejects malformed input before the pipeline runs; shared by the HTTP server and the CLI.

use serde_json::Value;

use crate::error::ExtractError;

const OP: &str = "ParseRequest";

/// A validated extraction request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractRequest {
    pub html: String,
}

impl ExtractRequest {
    /// Wraps an HTML string, rejecting empty input.
    pub fn new(html: impl Into<String>) -> Result<Self, ExtractError> {
        let html = html.into();
        if html.is_empty() {
            return Err(ExtractError::invalid_input(OP, "Invalid 'html' field"));
        }
        Ok(Self { html })
    }

    /// Parses and validates a raw JSON body.
    pub fn from_json_bytes(body: &[u8]) -> Result<Self, ExtractError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ExtractError::invalid_input(OP, "No JSON data provided"));
        }
        let value: Value = serde_json::from_slice(body)
            .map_err(|_| ExtractError::invalid_input(OP, "No JSON data provided"))?;
        Self::from_value(value)
    }

    /// Validates an already parsed JSON value.
    ///
    /// Empty values (`null`, `false`, `0`, `""`, `[]`, `{}`) count as no data.
    /// Any other non-object has no `html` field.
    pub fn from_value(value: Value) -> Result<Self, ExtractError> {
        if is_empty_value(&value) {
            return Err(ExtractError::invalid_input(OP, "No JSON data provided"));
        }
        let Value::Object(mut object) = value else {
            return Err(missing_html());
        };
        match object.remove("html") {
            None => Err(missing_html()),
            Some(Value::String(html)) => Self::new(html),
            Some(_) => Err(ExtractError::invalid_input(OP, "Invalid 'html' field")),
        }
    }
}

fn missing_html() -> ExtractError {
    ExtractError::invalid_input(OP, "Missing 'html' field in request")
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
