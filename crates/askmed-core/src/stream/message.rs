use crate::error::{AskError, Result};
use serde_json::Value;

/// The two message shapes the answer stream carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireMessage {
    Chunk(String),
    Done,
}

/// Classify one event payload.
///
/// `Ok(None)` is an empty chunk, which the server sends to open the stream.
/// Anything that is not `{"chunk": "..."}` or `{"done": true}` is a parse error.
pub fn parse_message(payload: &str) -> Result<Option<WireMessage>> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|e| AskError::Parse(format!("{e}: {payload}")))?;

    if value.get("done").and_then(Value::as_bool) == Some(true) {
        return Ok(Some(WireMessage::Done));
    }

    match value.get("chunk").and_then(Value::as_str) {
        Some("") => Ok(None),
        Some(text) => Ok(Some(WireMessage::Chunk(text.to_string()))),
        None => Err(AskError::Parse(format!("unrecognized message: {payload}"))),
    }
}
