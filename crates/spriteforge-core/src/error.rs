//! Error types for SpriteForge

use thiserror::Error;

/// The main error type for SpriteForge operations
#[derive(Debug, Error)]
pub enum SpriteError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("HTTP status {code}: {body}")]
    StatusError { code: u16, body: String },

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Remote error {code}: {message}")]
    RemoteError { code: i64, message: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Archive error: {0}")]
    ArchiveError(String),

    #[error("Job {job_id} not ready after {attempts} status checks")]
    PollTimeout { job_id: String, attempts: u32 },

    #[error("Job failed: {0}")]
    JobFailed(String),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Catalog error: {0}")]
    CatalogError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for SpriteForge operations
pub type Result<T> = std::result::Result<T, SpriteError>;

impl From<toml::de::Error> for SpriteError {
    fn from(err: toml::de::Error) -> Self {
        SpriteError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for SpriteError {
    fn from(err: toml::ser::Error) -> Self {
        SpriteError::TomlSerError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_timeout_message() {
        let err = SpriteError::PollTimeout {
            job_id: "abc".to_string(),
            attempts: 60,
        };
        assert_eq!(err.to_string(), "Job abc not ready after 60 status checks");
    }

    #[test]
    fn test_toml_error_conversion() {
        let parsed: std::result::Result<toml::Value, _> = toml::from_str("= broken");
        let err: SpriteError = parsed.unwrap_err().into();
        assert!(matches!(err, SpriteError::TomlParseError(_)));
    }
}
