//! Data models for the config fetcher
//!
//! This module defines the configuration document served by the config server
//! and the shape validation that decides whether a decoded document may be
//! handed to the data-collector.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::constants::keys;
use crate::errors::ShapeError;

/// Device configuration consumed by the data-collector
///
/// Only built through [`Configuration::from_value`], so a value of this type
/// always carries all required keys. Keys beyond the required ones are kept
/// verbatim in `extra` and written back out on persistence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Configuration {
    /// Device identifier
    pub id: String,
    /// URL the data-collector polls
    pub endpoint: String,
    /// Seconds between polls
    pub interval: u64,
    /// Additional keys, preserved but not validated
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Configuration {
    /// Validate a decoded JSON document and build a configuration from it
    ///
    /// Every missing required key is reported at once. A key that is present
    /// with the wrong type is reported only when no key is missing.
    pub fn from_value(value: Value) -> Result<Self, ShapeError> {
        let mut object = match value {
            Value::Object(object) => object,
            other => {
                return Err(ShapeError::NotAnObject {
                    found: json_type_name(&other).to_string(),
                })
            }
        };

        if object.is_empty() {
            return Err(ShapeError::Empty);
        }

        let missing: Vec<String> = keys::REQUIRED
            .iter()
            .filter(|key| !object.contains_key(**key))
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ShapeError::MissingKeys { keys: missing });
        }

        let id = take_string(&mut object, keys::ID)?;
        let endpoint = take_string(&mut object, keys::ENDPOINT)?;
        let interval = match object.remove(keys::INTERVAL).and_then(|v| v.as_u64()) {
            Some(interval) if interval > 0 => interval,
            _ => return Err(invalid_type(keys::INTERVAL, "a positive integer")),
        };

        Ok(Self {
            id,
            endpoint,
            interval,
            extra: object,
        })
    }

    /// Number of keys the configuration carries, required ones included
    pub fn key_count(&self) -> usize {
        keys::REQUIRED.len() + self.extra.len()
    }
}

fn take_string(object: &mut Map<String, Value>, key: &str) -> Result<String, ShapeError> {
    match object.remove(key) {
        Some(Value::String(s)) => Ok(s),
        _ => Err(invalid_type(key, "a string")),
    }
}

fn invalid_type(key: &str, expected: &str) -> ShapeError {
    ShapeError::InvalidType {
        key: key.to_string(),
        expected: expected.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
