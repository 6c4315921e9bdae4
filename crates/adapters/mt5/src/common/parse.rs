//! Parsing utilities for MetaTrader 5 data.
//!
//! The terminal answers `None` for "nothing found", which reaches us as JSON
//! `null`. These helpers turn that into `Option` / empty collections.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Missing field: {0}")]
    MissingField(String),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Decodes a terminal structure, mapping `null` to `None`.
pub fn parse_optional<T: DeserializeOwned>(value: Value) -> Result<Option<T>, ParseError> {
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| ParseError::InvalidValue(e.to_string()))
}

/// Decodes a tuple of terminal structures, mapping `null` to an empty list.
pub fn parse_list<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, ParseError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(_) => {
            serde_json::from_value(value).map_err(|e| ParseError::InvalidValue(e.to_string()))
        }
        other => Err(ParseError::InvalidValue(format!(
            "expected an array, received {other}"
        ))),
    }
}

/// Reads a boolean answer such as the one of `initialize` or `symbol_select`.
///
/// Accepts a bare boolean or an object carrying the flag under `field`.
pub fn parse_flag(value: &Value, field: &str) -> Result<bool, ParseError> {
    match value {
        Value::Bool(flag) => Ok(*flag),
        Value::Object(_) => value
            .get(field)
            .and_then(Value::as_bool)
            .ok_or_else(|| ParseError::MissingField(field.to_string())),
        other => Err(ParseError::InvalidValue(format!(
            "expected a boolean, received {other}"
        ))),
    }
}

pub fn extract_string_field(obj: &Value, field: &str) -> Result<String, ParseError> {
    obj.get(field)
        .and_then(Value::as_str)
        .map(|s| s.to_string())
        .ok_or_else(|| ParseError::MissingField(field.to_string()))
}
