//! Domain-specific configuration modules

pub mod benchmark;
pub mod http;
pub mod identity;
pub mod logging;
pub mod targets;
pub mod utils;

use crate::error::{ConfigError, ConfigResult};
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Main cmpbench configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BenchConfig {
    /// Batch size, pool size and generation settings
    pub benchmark: benchmark::BenchmarkConfig,

    /// Source of valid user ids
    pub identity: identity::IdentityConfig,

    /// Systems under test, benchmarked in this order
    pub targets: Vec<targets::TargetConfig>,

    /// Shared HTTP client configuration
    pub http: http::HttpConfig,

    /// Logging configuration
    pub logging: logging::LoggingConfig,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            benchmark: benchmark::BenchmarkConfig::default(),
            identity: identity::IdentityConfig::default(),
            targets: targets::default_targets(),
            http: http::HttpConfig::default(),
            logging: logging::LoggingConfig::default(),
        }
    }
}

impl BenchConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.benchmark.validate()?;
        self.identity.validate()?;
        self.http.validate()?;
        self.logging.validate()?;
        self.validate_targets()?;
        Ok(())
    }

    /// Find a configured target by name
    pub fn target(&self, name: &str) -> Option<&targets::TargetConfig> {
        self.targets.iter().find(|t| t.name == name)
    }

    fn validate_targets(&self) -> ConfigResult<()> {
        if self.targets.is_empty() {
            return Err(ConfigError::DomainError {
                domain: "targets".to_string(),
                message: "At least one target must be configured".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for target in &self.targets {
            target.validate()?;
            if !seen.insert(target.name.as_str()) {
                return Err(target.validation_error(format!(
                    "Duplicate target name '{}'",
                    target.name
                )));
            }
        }

        if self.target(&self.identity.target).is_none() {
            return Err(self.identity.validation_error(format!(
                "Identity target '{}' is not a configured target",
                self.identity.target
            )));
        }

        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = BenchConfig::default();
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
