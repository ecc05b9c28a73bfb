//! Error types for the content client

use thiserror::Error;

/// Content backend error
#[derive(Debug, Error)]
pub enum ContentError {
    /// Connection settings rejected at construction
    #[error("Invalid content configuration: {0}")]
    Config(String),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Backend error {status}: {message}")]
    Backend { status: u16, message: String },

    /// Response body could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Endpoint URL could not be built
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type for content operations
pub type Result<T> = std::result::Result<T, ContentError>;
