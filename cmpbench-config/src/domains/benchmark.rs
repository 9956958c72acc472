//! Benchmark run configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, Validatable};
use serde::{Deserialize, Serialize};

/// Per-run benchmark parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Number of requests sent to every target
    #[serde(default = "default_requests_per_target")]
    pub requests_per_target: usize,

    /// Number of concurrent workers per target run
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Seed for request generation; random when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Log every response body at debug level
    pub log_bodies: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            requests_per_target: default_requests_per_target(),
            workers: default_workers(),
            seed: None,
            log_bodies: false,
        }
    }
}

impl Validatable for BenchmarkConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.workers, "workers", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "benchmark"
    }
}

fn default_requests_per_target() -> usize {
    1000
}

fn default_workers() -> usize {
    10
}
