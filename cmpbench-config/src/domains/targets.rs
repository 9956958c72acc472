//! Systems-under-test configuration

use crate::error::ConfigResult;
use crate::validation::{
    validate_base_url, validate_enum_choice, validate_path, validate_positive,
    validate_required_string, Validatable,
};
use serde::{Deserialize, Serialize};

/// One backend service under comparative measurement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetConfig {
    /// Name shown in the report
    pub name: String,

    /// URL scheme, `http` or `https`
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Host name or address
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port
    pub port: u16,

    /// Path of the listing endpoint
    pub path: String,

    /// Pagination convention the endpoint understands
    #[serde(default)]
    pub pagination: PaginationConfig,
}

/// Query parameter shape used to paginate a target
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "style", rename_all = "lowercase")]
pub enum PaginationConfig {
    /// `limit=<limit>&offset=<bucket * stride>`
    Offset {
        #[serde(default = "default_limit")]
        limit: u32,
        #[serde(default = "default_stride")]
        stride: u32,
        #[serde(default = "default_buckets")]
        buckets: u32,
    },
    /// `page=<bucket>`
    Page {
        #[serde(default = "default_buckets")]
        buckets: u32,
    },
}

impl Default for PaginationConfig {
    fn default() -> Self {
        PaginationConfig::Offset {
            limit: default_limit(),
            stride: default_stride(),
            buckets: default_buckets(),
        }
    }
}

impl PaginationConfig {
    /// Number of distinct pagination values drawn from
    pub fn buckets(&self) -> u32 {
        match self {
            PaginationConfig::Offset { buckets, .. } | PaginationConfig::Page { buckets } => {
                *buckets
            }
        }
    }
}

impl TargetConfig {
    /// Create a plain-http localhost target with default offset pagination
    pub fn new(name: impl Into<String>, port: u16, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scheme: default_scheme(),
            host: default_host(),
            port,
            path: path.into(),
            pagination: PaginationConfig::default(),
        }
    }

    /// Replace the pagination convention
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }
}

impl Validatable for TargetConfig {
    fn validate(&self) -> ConfigResult<()> {
        let domain = self.domain_name();

        validate_required_string(&self.name, "name", domain)?;
        validate_enum_choice(&self.scheme, &["http", "https"], "scheme", domain)?;
        validate_base_url(&self.scheme, &self.host, "host", domain)?;
        validate_positive(self.port, "port", domain)?;
        validate_path(&self.path, "path", domain)?;
        self.pagination.validate()?;

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "targets"
    }
}

impl Validatable for PaginationConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.buckets(), "buckets", self.domain_name())?;

        if let PaginationConfig::Offset {
            limit,
            stride,
            buckets,
        } = self
        {
            validate_positive(*limit, "limit", self.domain_name())?;
            validate_positive(*stride, "stride", self.domain_name())?;

            // Largest offset sent is (buckets - 1) * stride
            if buckets.saturating_sub(1).checked_mul(*stride).is_none() {
                return Err(self.validation_error(format!(
                    "offset {} x {} does not fit in 32 bits",
                    buckets - 1,
                    stride
                )));
            }
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "targets.pagination"
    }
}

/// The four equivalent item APIs compared by default
pub fn default_targets() -> Vec<TargetConfig> {
    vec![
        TargetConfig::new("go", 3001, "/api/v1/items").with_pagination(PaginationConfig::Page {
            buckets: default_buckets(),
        }),
        TargetConfig::new("rails", 3000, "/api/v1/items"),
        TargetConfig::new("sinatra", 4567, "/api/v1/items"),
        TargetConfig::new("postgrest", 3002, "/get_user_items"),
    ]
}

fn default_scheme() -> String {
    "http".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_limit() -> u32 {
    10
}

fn default_stride() -> u32 {
    10
}

fn default_buckets() -> u32 {
    10
}
