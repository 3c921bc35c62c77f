//! JSON-RPC envelope and MCP tool result types
//!
//! Requests are `{jsonrpc, id, method, params}`. Tool invocations use the
//! `tools/call` method with `{name, arguments}` params. Arguments are passed
//! through untouched; the remote side is the only validator.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use spriteforge_core::{Result, SpriteError};

pub const JSONRPC_VERSION: &str = "2.0";
pub const METHOD_TOOLS_LIST: &str = "tools/list";
pub const METHOD_TOOLS_CALL: &str = "tools/call";

/// A JSON-RPC request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    pub params: Value,
}

impl RpcRequest {
    pub fn new(id: u64, method: &str, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.to_string(),
            params,
        }
    }

    /// `tools/call` request for the named tool
    pub fn tool_call(id: u64, tool: &str, arguments: Value) -> Self {
        Self::new(
            id,
            METHOD_TOOLS_CALL,
            serde_json::json!({
                "name": tool,
                "arguments": arguments,
            }),
        )
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "jsonrpc": self.jsonrpc,
            "id": self.id,
            "method": self.method,
            "params": self.params,
        })
    }
}

/// JSON-RPC error member
#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

/// Fail if the decoded envelope carries a JSON-RPC `error` member
pub fn check_envelope(envelope: &Value) -> Result<()> {
    match envelope.get("error") {
        Some(err) if !err.is_null() => {
            let parsed: RpcError = serde_json::from_value(err.clone()).unwrap_or(RpcError {
                code: 0,
                message: err.to_string(),
            });
            Err(SpriteError::RemoteError {
                code: parsed.code,
                message: parsed.message,
            })
        }
        _ => Ok(()),
    }
}

/// One item of a tool result's `content` array
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    Text {
        text: String,
    },
    Image {
        #[serde(default)]
        data: Option<String>,
        #[serde(default)]
        url: Option<String>,
        #[serde(default, rename = "mimeType")]
        mime_type: Option<String>,
    },
    #[serde(other)]
    Other,
}

/// Where the bytes of a generated image live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Base64-encoded image bytes
    Inline(String),
    /// A URL to fetch the bytes from
    Url(String),
}

/// The `result` object of a decoded envelope
pub fn result_of(envelope: &Value) -> Option<&Value> {
    envelope.get("result")
}

/// Typed `result.content` items; unknown shapes are dropped
pub fn content_items(envelope: &Value) -> Vec<ContentItem> {
    result_of(envelope)
        .and_then(|r| r.get("content"))
        .and_then(|c| c.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// All text content joined by newlines
pub fn text_content(envelope: &Value) -> String {
    content_items(envelope)
        .into_iter()
        .filter_map(|item| match item {
            ContentItem::Text { text } => Some(text),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Find image bytes in a response.
///
/// Checks `result.image_data`, then `result.image_url`, then the first
/// `image` content item carrying `data` or `url`.
pub fn image_source(envelope: &Value) -> Option<ImageSource> {
    let result = result_of(envelope)?;

    if let Some(data) = result.get("image_data").and_then(|v| v.as_str()) {
        return Some(ImageSource::Inline(data.to_string()));
    }
    if let Some(url) = result.get("image_url").and_then(|v| v.as_str()) {
        return Some(ImageSource::Url(url.to_string()));
    }

    content_items(envelope).into_iter().find_map(|item| match item {
        ContentItem::Image {
            data: Some(data), ..
        } => Some(ImageSource::Inline(data)),
        ContentItem::Image { url: Some(url), .. } => Some(ImageSource::Url(url)),
        _ => None,
    })
}

/// A tool advertised by `tools/list`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "inputSchema", skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

/// A parameter from a tool's input schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolParam {
    pub name: String,
    pub kind: String,
    pub description: String,
    pub required: bool,
}

impl ToolInfo {
    pub fn parameters(&self) -> Vec<ToolParam> {
        let Some(schema) = self.input_schema.as_ref() else {
            return Vec::new();
        };
        let required: Vec<&str> = schema
            .get("required")
            .and_then(|r| r.as_array())
            .map(|r| r.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default();

        schema
            .get("properties")
            .and_then(|p| p.as_object())
            .map(|props| {
                props
                    .iter()
                    .map(|(name, details)| ToolParam {
                        name: name.clone(),
                        kind: details
                            .get("type")
                            .and_then(|t| t.as_str())
                            .unwrap_or("unknown")
                            .to_string(),
                        description: details
                            .get("description")
                            .and_then(|d| d.as_str())
                            .unwrap_or("")
                            .to_string(),
                        required: required.contains(&name.as_str()),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_fields() {
        let args = json!({"character_id": "1b6c", "size": 64, "palette": ["#D4A574"]});
        let request = RpcRequest::new(7, "tools/call", args.clone());
        let value = request.to_value();

        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["id"], 7);
        assert_eq!(value["method"], "tools/call");
        assert_eq!(value["params"], args);
        assert_eq!(serde_json::to_value(&request).unwrap(), value);
    }

    #[test]
    fn test_tool_call_wraps_arguments() {
        let request = RpcRequest::tool_call(1, "get_character", json!({"character_id": "abc"}));
        assert_eq!(request.method, METHOD_TOOLS_CALL);
        assert_eq!(
            request.params,
            json!({"name": "get_character", "arguments": {"character_id": "abc"}})
        );
    }

    #[test]
    fn test_check_envelope_error() {
        let envelope = json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32602, "message": "bad size"}});
        match check_envelope(&envelope) {
            Err(SpriteError::RemoteError { code, message }) => {
                assert_eq!(code, -32602);
                assert_eq!(message, "bad size");
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(check_envelope(&json!({"result": {}})).is_ok());
    }

    #[test]
    fn test_image_source_variants() {
        let inline = json!({"result": {"image_data": "aGk="}});
        assert_eq!(image_source(&inline), Some(ImageSource::Inline("aGk=".into())));

        let url = json!({"result": {"image_url": "https://cdn.example/x.png"}});
        assert_eq!(
            image_source(&url),
            Some(ImageSource::Url("https://cdn.example/x.png".into()))
        );

        let content = json!({"result": {"content": [
            {"type": "text", "text": "Here you go"},
            {"type": "image", "data": "iVBO", "mimeType": "image/png"}
        ]}});
        assert_eq!(image_source(&content), Some(ImageSource::Inline("iVBO".into())));

        assert_eq!(image_source(&json!({"result": {"content": []}})), None);
    }

    #[test]
    fn test_text_content_skips_unknown_items() {
        let envelope = json!({"result": {"content": [
            {"type": "text", "text": "line one"},
            {"type": "resource", "uri": "file:///x"},
            {"type": "text", "text": "line two"}
        ]}});
        assert_eq!(text_content(&envelope), "line one\nline two");
    }

    #[test]
    fn test_tool_parameters() {
        let tool: ToolInfo = serde_json::from_value(json!({
            "name": "create_character",
            "description": "Create a character",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "description": {"type": "string", "description": "What to draw"},
                    "size": {"type": "integer"}
                },
                "required": ["description"]
            }
        }))
        .unwrap();

        let params = tool.parameters();
        assert_eq!(params.len(), 2);
        let desc = params.iter().find(|p| p.name == "description").unwrap();
        assert!(desc.required);
        assert_eq!(desc.kind, "string");
        let size = params.iter().find(|p| p.name == "size").unwrap();
        assert!(!size.required);
    }
}
