use super::error::ShipperError;
use serde::Serialize;
use serde_json::{Map, Value};

/// One unit of log data submitted by a caller.
///
/// Immutable once constructed; a record is carried verbatim, with no special
/// handling of keys that collide with the message form's field name.
#[derive(Debug, Clone, PartialEq)]
pub enum LogEvent {
    Message(String),
    Record(Map<String, Value>),
}

impl LogEvent {
    pub fn message(text: impl Into<String>) -> Self {
        Self::Message(text.into())
    }

    pub fn record(fields: Map<String, Value>) -> Self {
        Self::Record(fields)
    }

    /// Build a record from any serializable value.
    ///
    /// The value must serialize to a JSON object. Serializer failures (non-string
    /// map keys, custom impls that refuse) and non-object values are
    /// `ShipperError::Encoding`.
    pub fn from_serializable<T>(record: &T) -> Result<Self, ShipperError>
    where
        T: Serialize + ?Sized,
    {
        match serde_json::to_value(record)? {
            Value::Object(fields) => Ok(Self::Record(fields)),
            other => Err(ShipperError::Encoding(format!(
                "record must serialize to a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn is_message(&self) -> bool {
        matches!(self, Self::Message(_))
    }
}

impl From<&str> for LogEvent {
    fn from(text: &str) -> Self {
        Self::message(text)
    }
}

impl From<String> for LogEvent {
    fn from(text: String) -> Self {
        Self::Message(text)
    }
}

impl From<Map<String, Value>> for LogEvent {
    fn from(fields: Map<String, Value>) -> Self {
        Self::Record(fields)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
