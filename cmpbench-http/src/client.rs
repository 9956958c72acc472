//! HTTP client implementation

use crate::config::HttpConfig;
use crate::errors::HttpError;
use crate::types::{GeneratedRequest, RawResponse};
use reqwest::Client;
use tracing::{debug, trace};

/// HTTP client trait for executing generated requests
///
/// Implementations must be safe to share between workers without external
/// locking.
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, request: GeneratedRequest) -> Result<RawResponse, HttpError>;
}

/// Pooled reqwest client built once from configuration
#[derive(Debug, Clone)]
pub struct HttpManager {
    client: Client,
}

impl HttpManager {
    /// Create a new HttpManager with default configuration
    pub fn new() -> Result<Self, HttpError> {
        Self::with_config(HttpConfig::default())
    }

    /// Create a new HttpManager with specific configuration
    pub fn with_config(config: HttpConfig) -> Result<Self, HttpError> {
        debug!(
            "Creating HttpManager (timeout: {:?}, max idle per host: {})",
            config.timeout, config.pool_max_idle_per_host
        );

        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .pool_max_idle_per_host(config.pool_max_idle_per_host);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        let client = builder.build()?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl HttpClient for HttpManager {
    async fn execute(&self, request: GeneratedRequest) -> Result<RawResponse, HttpError> {
        let (method, url, headers) = request.into_parts();
        trace!("{} {}", method, url);

        let response = self
            .client
            .request(method, url)
            .headers(headers)
            .send()
            .await?;

        trace!("HTTP response received: {}", response.status());
        Ok(RawResponse::from_reqwest(response))
    }
}
