//! HTTP client functionality for cmpbench
//!
//! One pooled client is built at startup and shared by every worker through
//! the [`HttpClient`] trait. Requests are plain data ([`GeneratedRequest`]);
//! responses keep their body as a stream ([`RawResponse`]) so the consumer
//! decides when it is read.

pub mod client;
pub mod config;
pub mod errors;
pub mod types;

// Re-export main types for convenience
pub use client::{HttpClient, HttpManager};
pub use config::HttpConfig;
pub use errors::HttpError;
pub use types::{GeneratedRequest, RawResponse, APPLICATION_JSON, X_USER_ID};

pub use reqwest::StatusCode;
