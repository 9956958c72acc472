//! HTTP client configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout; requests never time out when unset
    #[serde(
        with = "crate::domains::utils::serde_duration_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,

    /// TCP connect timeout
    #[serde(
        with = "crate::domains::utils::serde_duration_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub connect_timeout: Option<Duration>,

    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum idle pooled connections kept per host
    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: None,
            user_agent: default_user_agent(),
            pool_max_idle_per_host: default_pool_max_idle_per_host(),
        }
    }
}

impl Validatable for HttpConfig {
    fn validate(&self) -> ConfigResult<()> {
        for (field, timeout) in [
            ("timeout", self.timeout),
            ("connect_timeout", self.connect_timeout),
        ] {
            if timeout.is_some_and(|t| t.is_zero()) {
                return Err(self.validation_error(format!("{} must be greater than 0", field)));
            }
        }

        validate_required_string(&self.user_agent, "user_agent", self.domain_name())?;
        validate_positive(
            self.pool_max_idle_per_host,
            "pool_max_idle_per_host",
            self.domain_name(),
        )?;

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "http"
    }
}

fn default_user_agent() -> String {
    concat!("cmpbench/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_pool_max_idle_per_host() -> usize {
    10
}
