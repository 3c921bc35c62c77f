//! PixelLab MCP client
//!
//! Wraps envelope building, transport and decoding behind the handful of
//! tool operations the pipeline uses. Every call is synchronous.

use crate::config::SpriteConfig;
use crate::decode::decode_body;
use crate::rpc::{self, RpcRequest, ToolInfo};
use crate::tools::*;
use crate::transport::{HttpTransport, Transport};
use serde::Serialize;
use serde_json::Value;
use spriteforge_core::{Result, SpriteError};
use std::cell::Cell;
use tracing::debug;

/// Longest slice of an error body kept in a status error
const ERROR_BODY_LIMIT: usize = 500;

pub struct PixelLabClient<T: Transport = HttpTransport> {
    transport: T,
    api_url: String,
    api_key: String,
    next_id: Cell<u64>,
}

impl PixelLabClient<HttpTransport> {
    /// Build an HTTP client from config. Fails when no API key is set.
    pub fn from_config(config: &SpriteConfig) -> Result<Self> {
        let api_key = config.api_key()?.to_string();
        Ok(Self::new(
            HttpTransport::from_config(config),
            config.api_url(),
            api_key,
        ))
    }
}

impl<T: Transport> PixelLabClient<T> {
    pub fn new(transport: T, api_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            api_url: api_url.to_string(),
            api_key: api_key.into(),
            next_id: Cell::new(1),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn take_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    /// Send one JSON-RPC request and return the decoded envelope
    pub fn request(&self, method: &str, params: Value) -> Result<Value> {
        let request = RpcRequest::new(self.take_id(), method, params);
        self.send(&request)
    }

    fn send(&self, request: &RpcRequest) -> Result<Value> {
        debug!(id = request.id, method = %request.method, "rpc request");
        let response = self
            .transport
            .post_json(&self.api_url, &self.api_key, &request.to_value())?;

        if !response.is_success() {
            let mut body = response.body;
            if body.len() > ERROR_BODY_LIMIT {
                let mut cut = ERROR_BODY_LIMIT;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(SpriteError::StatusError {
                code: response.status,
                body,
            });
        }

        let envelope = decode_body(response.content_type.as_deref(), &response.body)?;
        rpc::check_envelope(&envelope)?;
        Ok(envelope)
    }

    /// Invoke a tool by name with an argument object
    pub fn call_tool<A: Serialize>(&self, tool: &str, arguments: &A) -> Result<Value> {
        let arguments = serde_json::to_value(arguments)?;
        let request = RpcRequest::tool_call(self.take_id(), tool, arguments);
        self.send(&request)
    }

    /// Tools advertised by the service
    pub fn list_tools(&self) -> Result<Vec<ToolInfo>> {
        let envelope = self.request(rpc::METHOD_TOOLS_LIST, serde_json::json!({}))?;
        let tools = envelope
            .get("result")
            .and_then(|r| r.get("tools"))
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()));
        serde_json::from_value(tools).map_err(|e| {
            SpriteError::UnexpectedResponse(format!("tools/list result malformed: {}", e))
        })
    }

    pub fn create_character(&self, request: &CharacterRequest) -> Result<Value> {
        self.call_tool(TOOL_CREATE_CHARACTER, request)
    }

    pub fn animate_character(&self, request: &AnimationRequest) -> Result<Value> {
        self.call_tool(TOOL_ANIMATE_CHARACTER, request)
    }

    pub fn create_tileset(&self, request: &TilesetRequest) -> Result<Value> {
        self.call_tool(TOOL_CREATE_TILESET, request)
    }

    pub fn create_map_object(&self, request: &MapObjectRequest) -> Result<Value> {
        self.call_tool(TOOL_CREATE_MAP_OBJECT, request)
    }

    /// Status check for a long-running character job
    pub fn get_character(&self, character_id: &str) -> Result<Value> {
        self.call_tool(
            TOOL_GET_CHARACTER,
            &serde_json::json!({ "character_id": character_id }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{MockTransport, RawResponse};
    use serde_json::json;

    fn client() -> PixelLabClient<MockTransport> {
        PixelLabClient::new(MockTransport::new(), "https://api.example/mcp", "test-key")
    }

    #[test]
    fn test_call_tool_envelope_and_ids() {
        let client = client();
        client.transport().push_text("queued");
        client.transport().push_text("still being generated");

        client.get_character("abc").unwrap();
        client.get_character("abc").unwrap();

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests[0],
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "tools/call",
                "params": {"name": "get_character", "arguments": {"character_id": "abc"}}
            })
        );
        assert_eq!(requests[1]["id"], 2);
    }

    #[test]
    fn test_event_stream_response() {
        let client = client();
        let payload = json!({"jsonrpc": "2.0", "id": 1, "result": {"tools": [
            {"name": "create_character", "description": "Make a character"},
            {"name": "get_character"}
        ]}});
        client.transport().push_event_stream(payload);

        let tools = client.list_tools().unwrap();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].name, "create_character");
        assert_eq!(tools[1].description, None);
        assert_eq!(client.transport().requests()[0]["method"], "tools/list");
        assert_eq!(client.transport().requests()[0]["params"], json!({}));
    }

    #[test]
    fn test_non_success_status() {
        let client = client();
        client.transport().push_response(RawResponse {
            status: 401,
            content_type: Some("text/plain".to_string()),
            body: "invalid token".to_string(),
        });

        match client.get_character("abc") {
            Err(SpriteError::StatusError { code, body }) => {
                assert_eq!(code, 401);
                assert_eq!(body, "invalid token");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_remote_error_member() {
        let client = client();
        client.transport().push_json(json!({
            "jsonrpc": "2.0", "id": 1,
            "error": {"code": -32601, "message": "Method not found"}
        }));
        let err = client.request("tools/unknown", json!({})).unwrap_err();
        assert!(matches!(err, SpriteError::RemoteError { code: -32601, .. }));
    }

    #[test]
    fn test_create_map_object_arguments() {
        let client = client();
        client.transport().push_json(json!({"result": {"image_url": "https://cdn/x.png"}}));

        let request = MapObjectRequest {
            name: "Obelisk".to_string(),
            description: "Small damaged obelisk".to_string(),
            object_type: "obstacle".to_string(),
            size: 80,
            has_shadow: true,
        };
        client.create_map_object(&request).unwrap();

        let params = &client.transport().requests()[0]["params"];
        assert_eq!(params["name"], "create_map_object");
        assert_eq!(params["arguments"]["size"], 80);
        assert_eq!(params["arguments"]["type"], "obstacle");
    }
}
