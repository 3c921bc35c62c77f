//! Synchronous transport
//!
//! The pipeline only needs two calls: POST a JSON body with a bearer token,
//! and GET raw bytes for downloads. Nothing is retried.

pub mod http;
pub mod mock;

pub use http::HttpTransport;
pub use mock::MockTransport;

use serde_json::Value;
use spriteforge_core::Result;

/// A response as received, before any decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network seam for the client and the asset writer
pub trait Transport {
    /// POST `body` as JSON to `url` with `Authorization: Bearer <api_key>`
    fn post_json(&self, url: &str, api_key: &str, body: &Value) -> Result<RawResponse>;

    /// GET `url` and return the body bytes; non-2xx is an error
    fn get_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post_json(&self, url: &str, api_key: &str, body: &Value) -> Result<RawResponse> {
        (**self).post_json(url, api_key, body)
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        (**self).get_bytes(url)
    }
}
