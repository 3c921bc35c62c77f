//! In-memory transport serving canned responses
//!
//! Responses are consumed in order, one per POST. Downloads are looked up by
//! exact URL. Every request body is recorded for inspection.

use super::{RawResponse, Transport};
use crate::decode::EVENT_STREAM_CONTENT_TYPE;
use serde_json::Value;
use spriteforge_core::{Result, SpriteError};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

#[derive(Default)]
pub struct MockTransport {
    responses: RefCell<VecDeque<RawResponse>>,
    downloads: RefCell<HashMap<String, Vec<u8>>>,
    requests: RefCell<Vec<Value>>,
    fetched: RefCell<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, response: RawResponse) {
        self.responses.borrow_mut().push_back(response);
    }

    /// Queue a 200 response with a plain JSON body
    pub fn push_json(&self, value: Value) {
        self.push_response(RawResponse {
            status: 200,
            content_type: Some("application/json".to_string()),
            body: value.to_string(),
        });
    }

    /// Queue a 200 response wrapping `value` in a single event
    pub fn push_event_stream(&self, value: Value) {
        self.push_response(RawResponse {
            status: 200,
            content_type: Some(EVENT_STREAM_CONTENT_TYPE.to_string()),
            body: format!("event: message\ndata: {}\n\n", value),
        });
    }

    /// Queue a `tools/call` result whose only content is `text`
    pub fn push_text(&self, text: &str) {
        self.push_json(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"content": [{"type": "text", "text": text}]}
        }));
    }

    pub fn serve_download(&self, url: &str, bytes: &[u8]) {
        self.downloads
            .borrow_mut()
            .insert(url.to_string(), bytes.to_vec());
    }

    /// Bodies of every POST, in order
    pub fn requests(&self) -> Vec<Value> {
        self.requests.borrow().clone()
    }

    pub fn post_count(&self) -> usize {
        self.requests.borrow().len()
    }

    /// URLs of every GET, in order
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.borrow().len()
    }
}

impl Transport for MockTransport {
    fn post_json(&self, _url: &str, _api_key: &str, body: &Value) -> Result<RawResponse> {
        self.requests.borrow_mut().push(body.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| SpriteError::HttpError("no canned response left".to_string()))
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        self.fetched.borrow_mut().push(url.to_string());
        self.downloads
            .borrow()
            .get(url)
            .cloned()
            .ok_or_else(|| SpriteError::StatusError {
                code: 404,
                body: format!("no canned download for {}", url),
            })
    }
}
