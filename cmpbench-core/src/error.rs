//! Benchmark error types

use cmpbench_http::HttpError;
use thiserror::Error;

/// Every failure here is fatal to the run; the coordinator stops and reports it
#[derive(Debug, Error)]
pub enum BenchError {
    /// Transport or request construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// Identity endpoint returned something other than `[{"id": <int>}, ...]`
    #[error("Failed to parse identity list: {0}")]
    IdentityParse(#[from] serde_json::Error),

    #[error("Identity list is empty")]
    NoIdentities,

    #[error("Invalid target '{name}': {message}")]
    InvalidTarget { name: String, message: String },

    #[error("Unknown target: {0}")]
    UnknownTarget(String),

    #[error("Expected {expected} responses, received {received}")]
    MissingResponses { expected: usize, received: usize },

    #[error("Worker task failed: {0}")]
    Worker(String),

    /// A target's run failed; wraps the underlying cause
    #[error("Benchmark of target '{target}' failed")]
    Target {
        target: String,
        #[source]
        source: Box<BenchError>,
    },
}

/// Result type alias for benchmark operations
pub type Result<T> = std::result::Result<T, BenchError>;

impl BenchError {
    /// Attribute an error to the target whose run produced it
    pub fn for_target(self, target: impl Into<String>) -> Self {
        BenchError::Target {
            target: target.into(),
            source: Box::new(self),
        }
    }
}
