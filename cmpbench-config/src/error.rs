//! Configuration error types

use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read configuration file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Malformed YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// A `CMPBENCH_*` override could not be parsed
    #[error("Bad environment override: {0}")]
    EnvError(String),

    /// A domain failed validation
    #[error("Invalid {domain} configuration: {message}")]
    DomainError { domain: String, message: String },
}
