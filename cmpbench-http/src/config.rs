//! HTTP configuration

use cmpbench_config::domains::http::HttpConfig as ConfigHttpConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout, none by default
    pub timeout: Option<Duration>,

    /// TCP connect timeout
    pub connect_timeout: Option<Duration>,

    /// User agent string
    pub user_agent: String,

    /// Maximum idle pooled connections kept per host
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        ConfigHttpConfig::default().into()
    }
}

impl From<ConfigHttpConfig> for HttpConfig {
    fn from(config: ConfigHttpConfig) -> Self {
        Self {
            timeout: config.timeout,
            connect_timeout: config.connect_timeout,
            user_agent: config.user_agent,
            pool_max_idle_per_host: config.pool_max_idle_per_host,
        }
    }
}
