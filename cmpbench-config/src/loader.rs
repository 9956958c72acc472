//! Configuration loading and environment variable handling

use crate::domains::BenchConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "CMPBENCH".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<BenchConfig> {
        let content = std::fs::read_to_string(path)?;
        let mut config: BenchConfig = serde_yaml::from_str(&content)?;

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<BenchConfig> {
        let mut config = BenchConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<BenchConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut BenchConfig) -> ConfigResult<()> {
        self.apply_benchmark_overrides(&mut config.benchmark)?;
        self.apply_http_overrides(&mut config.http)?;
        self.apply_logging_overrides(&mut config.logging)?;
        Ok(())
    }

    fn apply_benchmark_overrides(
        &self,
        config: &mut crate::domains::benchmark::BenchmarkConfig,
    ) -> ConfigResult<()> {
        if let Some(requests) = self.parse_env_var("REQUESTS")? {
            config.requests_per_target = requests;
        }

        if let Some(workers) = self.parse_env_var("WORKERS")? {
            config.workers = workers;
        }

        if let Some(seed) = self.parse_env_var("SEED")? {
            config.seed = Some(seed);
        }

        if let Some(log_bodies) = self.parse_env_var("LOG_BODIES")? {
            config.log_bodies = log_bodies;
        }

        Ok(())
    }

    fn apply_http_overrides(
        &self,
        config: &mut crate::domains::http::HttpConfig,
    ) -> ConfigResult<()> {
        if let Some(seconds) = self.parse_env_var::<f64>("HTTP_TIMEOUT")? {
            let timeout = Duration::try_from_secs_f64(seconds)
                .map_err(|e| ConfigError::EnvError(format!("Invalid HTTP_TIMEOUT: {}", e)))?;
            config.timeout = Some(timeout);
        }

        if let Ok(user_agent) = self.get_env_var("HTTP_USER_AGENT") {
            config.user_agent = user_agent;
        }

        Ok(())
    }

    fn apply_logging_overrides(
        &self,
        config: &mut crate::domains::logging::LoggingConfig,
    ) -> ConfigResult<()> {
        if let Ok(log_level) = self.get_env_var("LOG_LEVEL") {
            config.level = log_level
                .parse()
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            config.format = format
                .parse()
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        Ok(())
    }

    /// Parse a prefixed environment variable, if set
    fn parse_env_var<T>(&self, key: &str) -> ConfigResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_env_var(key) {
            Ok(raw) => raw
                .parse()
                .map(Some)
                .map_err(|e| ConfigError::EnvError(format!("Invalid {}: {}", key, e))),
            Err(_) => Ok(None),
        }
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, key: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::logging::{LogFormat, LogLevel};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_env_overrides() {
        temp_env::with_vars(
            [
                ("CMPBENCH_REQUESTS", Some("100")),
                ("CMPBENCH_WORKERS", Some("4")),
                ("CMPBENCH_SEED", Some("42")),
                ("CMPBENCH_HTTP_TIMEOUT", Some("3")),
                ("CMPBENCH_LOG_LEVEL", Some("debug")),
                ("CMPBENCH_LOG_FORMAT", Some("json")),
            ],
            || {
                let config = ConfigLoader::new().from_env().unwrap();
                assert_eq!(config.benchmark.requests_per_target, 100);
                assert_eq!(config.benchmark.workers, 4);
                assert_eq!(config.benchmark.seed, Some(42));
                assert_eq!(config.http.timeout, Some(Duration::from_secs(3)));
                assert_eq!(config.logging.level, LogLevel::Debug);
                assert_eq!(config.logging.format, LogFormat::Json);
            },
        );
    }

    #[test]
    fn test_invalid_env_value() {
        temp_env::with_var("CMPBENCH_WORKERS", Some("many"), || {
            let err = ConfigLoader::new().from_env().unwrap_err();
            assert!(matches!(err, ConfigError::EnvError(_)));
        });
    }

    #[test]
    fn test_env_override_is_validated() {
        temp_env::with_var("CMPBENCH_WORKERS", Some("0"), || {
            let err = ConfigLoader::new().from_env().unwrap_err();
            assert!(matches!(err, ConfigError::DomainError { .. }));
        });
    }

    #[test]
    fn test_custom_prefix() {
        temp_env::with_var("BENCHTEST_REQUESTS", Some("7"), || {
            let config = ConfigLoader::with_prefix("BENCHTEST").from_env().unwrap();
            assert_eq!(config.benchmark.requests_per_target, 7);
        });
    }

    #[test]
    fn test_load_from_file() {
        let yaml = r#"
benchmark:
  requests_per_target: 50
  workers: 5
identity:
  target: api
  path: /users
targets:
  - name: api
    host: 127.0.0.1
    port: 8080
    path: /items
    pagination:
      style: page
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        temp_env::with_vars_unset(["CMPBENCH_REQUESTS", "CMPBENCH_WORKERS"], || {
            let config = ConfigLoader::new().load(Some(file.path())).unwrap();
            assert_eq!(config.benchmark.requests_per_target, 50);
            assert_eq!(config.benchmark.workers, 5);
            assert_eq!(config.targets.len(), 1);
            assert_eq!(config.targets[0].host, "127.0.0.1");
            assert_eq!(config.identity.path, "/users");
        });
    }

    #[test]
    fn test_load_missing_file() {
        let err = ConfigLoader::new()
            .from_file("/nonexistent/cmpbench.yaml")
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileReadError(_)));
    }
}
