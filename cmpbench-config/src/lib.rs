//! Domain-driven configuration management for cmpbench
//!
//! Configuration is split by functional domain (benchmark, identity, targets,
//! http, logging), loaded from YAML with environment overrides and validated
//! before use.

pub mod domains;
pub mod error;
pub mod loader;
pub mod validation;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

// Re-export domain configurations
pub use domains::{
    benchmark::BenchmarkConfig,
    http::HttpConfig,
    identity::IdentityConfig,
    logging::{LogFormat, LogLevel, LoggingConfig},
    targets::{PaginationConfig, TargetConfig},
    BenchConfig,
};

// Re-export utilities
pub use domains::utils::serde_duration_option;
