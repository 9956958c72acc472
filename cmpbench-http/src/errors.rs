//! HTTP error types

/// Error type for HTTP operations
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid header value for {name}: {value}")]
    InvalidHeaderValue { name: String, value: String },

    #[error("Failed to read response body: {0}")]
    BodyError(String),
}
