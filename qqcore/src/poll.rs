//! Decoding of long-poll responses.

use crate::payload::{PayloadError, parse_json};
use serde_json::Value;

/// What one long-poll round trip delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollMessage {
    Empty,
    /// String fragments of the first message, in order.
    Content(Vec<String>),
}

impl PollMessage {
    /// Fragments joined with single spaces; `None` for an empty poll.
    pub fn text(&self) -> Option<String> {
        match self {
            PollMessage::Empty => None,
            PollMessage::Content(fragments) => Some(fragments.join(" ")),
        }
    }
}

/// Why a poll iteration produced nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollIdleReason {
    /// The server held the request until its own timeout (HTTP 504).
    Timeout,
    /// A 200 response whose body did not have the message shape.
    Malformed(String),
}

/// Decodes `result[0].value.content`, keeping only its string elements.
///
/// Non-string elements (face codes, font descriptors) are dropped.
pub fn decode_poll_body(body: &[u8]) -> Result<PollMessage, PayloadError> {
    let value = parse_json(body)?;
    let content = value
        .get("result")
        .and_then(|r| r.get(0))
        .and_then(|m| m.get("value"))
        .and_then(|v| v.get("content"))
        .and_then(Value::as_array)
        .ok_or_else(|| PayloadError::MissingField("result[0].value.content".to_string()))?;

    let fragments = content
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();
    Ok(PollMessage::Content(fragments))
}
