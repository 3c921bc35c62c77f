//! Blocking HTTP transport built on `ureq`

use super::{RawResponse, Transport};
use crate::config::SpriteConfig;
use serde_json::Value;
use spriteforge_core::{Result, SpriteError};
use std::time::Duration;
use tracing::debug;

/// Accept both reply shapes the service may choose between
const ACCEPT: &str = "application/json, text/event-stream";
/// Upper bound on a buffered JSON-RPC reply; inline images can be large
const MAX_RESPONSE_BYTES: u64 = 256 * 1024 * 1024;

pub struct HttpTransport {
    request_timeout: Duration,
    download_timeout: Duration,
}

impl HttpTransport {
    pub fn new(request_timeout: Duration, download_timeout: Duration) -> Self {
        Self {
            request_timeout,
            download_timeout,
        }
    }

    pub fn from_config(config: &SpriteConfig) -> Self {
        Self::new(config.request_timeout(), config.download_timeout())
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::from_config(&SpriteConfig::default())
    }
}

fn build_agent(timeout: Duration) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build();
    config.into()
}

impl Transport for HttpTransport {
    fn post_json(&self, url: &str, api_key: &str, body: &Value) -> Result<RawResponse> {
        let agent = build_agent(self.request_timeout);
        debug!(url, "POST");

        let mut response = agent
            .post(url)
            .header("Authorization", &format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .header("Accept", ACCEPT)
            .send_json(body)
            .map_err(|e| SpriteError::HttpError(format!("POST {} failed: {}", url, e)))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_RESPONSE_BYTES)
            .read_to_string()
            .map_err(|e| SpriteError::HttpError(format!("Failed to read response: {}", e)))?;

        debug!(status, content_type = ?content_type, bytes = body.len(), "response");
        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let agent = build_agent(self.download_timeout);
        debug!(url, "GET");

        let response = agent
            .get(url)
            .call()
            .map_err(|e| SpriteError::HttpError(format!("GET {} failed: {}", url, e)))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(SpriteError::StatusError {
                code: status,
                body: format!("download of {} failed", url),
            });
        }

        let mut reader = response.into_body().into_reader();
        let mut bytes = Vec::new();
        std::io::Read::read_to_end(&mut reader, &mut bytes)
            .map_err(|e| SpriteError::HttpError(format!("Failed to read download: {}", e)))?;
        Ok(bytes)
    }
}
