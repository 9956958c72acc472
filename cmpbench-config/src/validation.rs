//! Configuration validation traits and utilities

use crate::error::{ConfigError, ConfigResult};

/// Trait for validatable configuration
pub trait Validatable {
    /// Validate the configuration
    fn validate(&self) -> ConfigResult<()>;

    /// Get the domain name for error reporting
    fn domain_name(&self) -> &'static str;

    /// Helper to create a domain-specific validation error
    fn validation_error(&self, message: impl Into<String>) -> ConfigError {
        ConfigError::DomainError {
            domain: self.domain_name().to_string(),
            message: message.into(),
        }
    }
}

/// Validate a required string field
pub fn validate_required_string(value: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} cannot be empty", field_name),
        });
    }
    Ok(())
}

/// Validate a positive number
pub fn validate_positive<T>(value: T, field_name: &str, domain: &str) -> ConfigResult<()>
where
    T: PartialOrd + Default + std::fmt::Display,
{
    if value <= T::default() {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} must be greater than 0, got {}", field_name, value),
        });
    }
    Ok(())
}

/// Validate that a URL path is absolute
pub fn validate_path(path: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    if !path.starts_with('/') {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} must start with '/', got '{}'", field_name, path),
        });
    }
    Ok(())
}

/// Validate that a scheme and host combine into a parseable base URL
pub fn validate_base_url(scheme: &str, host: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    validate_required_string(host, field_name, domain)?;

    let candidate = format!("{}://{}", scheme, host);
    let parsed = url::Url::parse(&candidate).map_err(|e| ConfigError::DomainError {
        domain: domain.to_string(),
        message: format!("{} has invalid URL format: {}", field_name, e),
    })?;

    if parsed.host_str().is_none() {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} '{}' does not contain a host", field_name, host),
        });
    }

    Ok(())
}

/// Validate an enum choice
pub fn validate_enum_choice<T: AsRef<str>>(
    value: &str,
    choices: &[T],
    field_name: &str,
    domain: &str,
) -> ConfigResult<()> {
    if !choices.iter().any(|choice| choice.as_ref() == value) {
        let valid_choices: Vec<&str> = choices.iter().map(|c| c.as_ref()).collect();
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!(
                "{} must be one of: {}, got '{}'",
                field_name,
                valid_choices.join(", "),
                value
            ),
        });
    }
    Ok(())
}
