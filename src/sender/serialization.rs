use crate::domain::{LogEvent, ShipperError};
use bytes::Bytes;
use serde::Serialize;

#[derive(Serialize)]
struct MessageBody<'a> {
    message: &'a str,
}

/// Turns a `LogEvent` into the JSON body sent to the collector.
///
/// Messages become `{"message": <text>}`; records are written as-is.
#[derive(Debug, Clone, Default)]
pub struct EventSerializer;

impl EventSerializer {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(&self, event: &LogEvent) -> Result<Bytes, ShipperError> {
        let body = match event {
            LogEvent::Message(text) => serde_json::to_vec(&MessageBody { message: text })?,
            LogEvent::Record(fields) => serde_json::to_vec(fields)?,
        };
        Ok(Bytes::from(body))
    }
}
