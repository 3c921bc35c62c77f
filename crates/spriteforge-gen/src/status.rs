//! Free-text job status classification
//!
//! The service reports job progress as prose ("still being generated (45%
//! complete)", "... ready! Download: https://..."). This module is the only
//! place that reads that prose; everything else works with [`JobState`].
//! The marker lists are a best guess at the service's wording and can be
//! replaced from config.

use crate::rpc::{self, ImageSource};
use serde_json::Value;

/// Structured view of a remote job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Queued,
    Processing { percent: Option<u8> },
    /// Finished. `source` is `None` when no image or URL could be found.
    Ready { source: Option<ImageSource> },
    Failed { reason: String },
    /// No marker matched; treated as still in flight
    Unrecognized,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Ready { .. } | JobState::Failed { .. })
    }
}

/// Case-insensitive substrings that identify each state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMarkers {
    pub processing: Vec<String>,
    pub queued: Vec<String>,
    pub failed: Vec<String>,
    pub ready: Vec<String>,
}

impl Default for StatusMarkers {
    fn default() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }
        Self {
            processing: owned(&["still being generated", "processing", "in progress"]),
            queued: owned(&["queued", "pending"]),
            failed: owned(&["failed", "could not be generated"]),
            ready: owned(&["download", "ready"]),
        }
    }
}

fn contains_any(haystack: &str, markers: &[String]) -> bool {
    markers
        .iter()
        .any(|m| !m.is_empty() && haystack.contains(&m.to_lowercase()))
}

/// Classify status prose. Markers are checked in the order processing,
/// queued, failed, ready.
pub fn classify_text(text: &str, markers: &StatusMarkers) -> JobState {
    let lower = text.to_lowercase();

    if contains_any(&lower, &markers.processing) {
        JobState::Processing {
            percent: extract_percent(text),
        }
    } else if contains_any(&lower, &markers.queued) {
        JobState::Queued
    } else if contains_any(&lower, &markers.failed) {
        JobState::Failed {
            reason: text.trim().to_string(),
        }
    } else if contains_any(&lower, &markers.ready) {
        JobState::Ready {
            source: extract_download_url(text).map(ImageSource::Url),
        }
    } else {
        JobState::Unrecognized
    }
}

/// Classify a decoded status response. An image in the result means the job
/// is ready regardless of the accompanying text.
pub fn classify_response(envelope: &Value, markers: &StatusMarkers) -> JobState {
    if let Some(source) = rpc::image_source(envelope) {
        return JobState::Ready {
            source: Some(source),
        };
    }
    classify_text(&rpc::text_content(envelope), markers)
}

/// Percentage from the digits just before the first `%`, clamped to 100
pub fn extract_percent(text: &str) -> Option<u8> {
    let idx = text.find('%')?;
    let head = &text[..idx];
    let start = head
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit() || *c == '.')
        .last()
        .map(|(i, _)| i)?;
    let number: f64 = head[start..].parse().ok()?;
    Some(number.round().clamp(0.0, 100.0) as u8)
}

/// First `https://` URL in the text, cut at the nearest closing delimiter
pub fn extract_download_url(text: &str) -> Option<String> {
    let start = text.find("https://")?;
    let rest = &text[start..];
    let end = rest
        .find(|c: char| matches!(c, ')' | ']' | '>' | '"' | '\'' | '`') || c.is_whitespace())
        .unwrap_or(rest.len());
    let url = rest[..end].trim_end_matches(['.', ',']);
    if url.len() > "https://".len() {
        Some(url.to_string())
    } else {
        None
    }
}

/// Pull an identifier following `key` out of prose like
/// `character_id: 1b6c...` or `"job_id": "abc"`
pub fn extract_identifier(text: &str, key: &str) -> Option<String> {
    let start = text.find(key)? + key.len();
    let rest = text[start..]
        .trim_start_matches(|c: char| c == ':' || c == '=' || c == '"' || c == '`' || c == '\'' || c.is_whitespace());
    let id: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

/// Identifier of a job created by a `create_*` call. Structured result
/// fields win over identifiers mentioned in the text.
pub fn extract_job_id(envelope: &Value) -> Option<String> {
    const KEYS: [&str; 2] = ["character_id", "job_id"];

    if let Some(result) = rpc::result_of(envelope) {
        for key in KEYS {
            if let Some(id) = result.get(key).and_then(|v| v.as_str()) {
                return Some(id.to_string());
            }
        }
    }
    let text = rpc::text_content(envelope);
    KEYS.iter().find_map(|key| extract_identifier(&text, key))
}
