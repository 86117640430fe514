//! Record parsing - one JSON object per input line

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_AUTHOR: &str = "unknown";
pub const DEFAULT_TIMESTAMP: &str = "unknown";
pub const DEFAULT_CATEGORY: &str = "uncategorized";

/// Why a line was dropped
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("malformed bytes: {0}")]
    MalformedBytes(#[from] std::str::Utf8Error),
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// A parsed input line with defaults already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Free text, carried along but never aggregated
    pub message: Option<String>,
    /// Defaults to `"unknown"`
    pub author: String,
    /// Defaults to `"unknown"`
    pub timestamp: String,
    /// Defaults to `"uncategorized"`
    pub category: String,
    /// No default; a record without sentiment still counts for its author
    pub sentiment: Option<f64>,
}

impl Record {
    /// Decode and parse one line.
    pub fn parse(line: &[u8]) -> Result<Self, RecordError> {
        let text = std::str::from_utf8(line)?;
        let value: Value = serde_json::from_str(text)?;

        match value {
            Value::Object(map) => Ok(Self::from_object(&map)),
            other => Err(RecordError::NotAnObject(json_kind(&other))),
        }
    }

    fn from_object(map: &Map<String, Value>) -> Self {
        let sentiment = match map.get("sentiment") {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => n.as_f64(),
            Some(other) => {
                warn!(value = %other, "Ignoring non-numeric sentiment");
                None
            }
        };

        Self {
            message: text_field(map, "message"),
            author: text_field(map, "author").unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            timestamp: text_field(map, "timestamp").unwrap_or_else(|| DEFAULT_TIMESTAMP.to_string()),
            category: text_field(map, "category").unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            sentiment,
        }
    }
}

/// Strings are taken as-is, other scalars by their JSON text, null as absent.
fn text_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Whitespace-only lines are treated like "no data yet".
pub fn is_blank(line: &[u8]) -> bool {
    match std::str::from_utf8(line) {
        Ok(text) => text.trim().is_empty(),
        Err(_) => false,
    }
}
