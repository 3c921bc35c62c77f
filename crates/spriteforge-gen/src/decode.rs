//! Response body decoding
//!
//! The service answers either with a JSON document or with an event stream
//! whose first `data:` line carries that same JSON. Only the first data line
//! is read; comments, later events and multi-line data fields are ignored.

use serde_json::Value;
use spriteforge_core::{Result, SpriteError};

pub const EVENT_STREAM_CONTENT_TYPE: &str = "text/event-stream";
const DATA_PREFIX: &str = "data:";
/// Line starts that can only open an event stream (`:` is a comment)
const STREAM_LINE_PREFIXES: [&str; 4] = ["event:", DATA_PREFIX, "id:", ":"];

/// Whether a response should be read as an event stream
pub fn is_event_stream(content_type: Option<&str>, body: &str) -> bool {
    if content_type
        .map(|ct| ct.trim().to_ascii_lowercase().starts_with(EVENT_STREAM_CONTENT_TYPE))
        .unwrap_or(false)
    {
        return true;
    }
    let head = body.trim_start();
    STREAM_LINE_PREFIXES
        .iter()
        .any(|prefix| head.starts_with(prefix))
}

/// Decode a body into one JSON value, whichever wire shape it arrived in
pub fn decode_body(content_type: Option<&str>, body: &str) -> Result<Value> {
    if is_event_stream(content_type, body) {
        let payload = first_data_line(body).ok_or_else(|| {
            SpriteError::DecodeError("event stream contained no data line".to_string())
        })?;
        serde_json::from_str(payload)
            .map_err(|e| SpriteError::DecodeError(format!("invalid JSON in data line: {}", e)))
    } else {
        serde_json::from_str(body)
            .map_err(|e| SpriteError::DecodeError(format!("invalid JSON body: {}", e)))
    }
}

/// Payload of the first `data:` line, with one optional leading space removed
fn first_data_line(body: &str) -> Option<&str> {
    body.lines()
        .find_map(|line| line.strip_prefix(DATA_PREFIX))
        .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
}
