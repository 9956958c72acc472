//! Systems under test

use crate::error::{BenchError, Result};
use cmpbench_config::{PaginationConfig, TargetConfig};
use std::fmt;
use url::Url;

/// Query parameter shape a target understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// `limit=<limit>&offset=<bucket * stride>`
    Offset { limit: u32, stride: u32, buckets: u32 },
    /// `page=<bucket>`
    Page { buckets: u32 },
}

impl Pagination {
    /// Number of distinct values a generated request draws from
    pub fn buckets(&self) -> u32 {
        match self {
            Pagination::Offset { buckets, .. } | Pagination::Page { buckets } => *buckets,
        }
    }

    /// Query pairs for the given bucket, in the order they are appended
    pub fn query_pairs(&self, bucket: u32) -> Vec<(&'static str, String)> {
        match self {
            Pagination::Offset { limit, stride, .. } => vec![
                ("limit", limit.to_string()),
                ("offset", offset(bucket, *stride).to_string()),
            ],
            Pagination::Page { .. } => vec![("page", bucket.to_string())],
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        PaginationConfig::default().into()
    }
}

impl fmt::Display for Pagination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pagination::Offset {
                limit,
                stride,
                buckets,
            } => write!(
                f,
                "limit={} offset=0..{} step {}",
                limit,
                offset(buckets.saturating_sub(1), *stride),
                stride
            ),
            Pagination::Page { buckets } => write!(f, "page=0..{}", buckets.saturating_sub(1)),
        }
    }
}

/// Widened so no stride and bucket pair can overflow
fn offset(bucket: u32, stride: u32) -> u64 {
    u64::from(bucket) * u64::from(stride)
}

impl From<PaginationConfig> for Pagination {
    fn from(config: PaginationConfig) -> Self {
        match config {
            PaginationConfig::Offset {
                limit,
                stride,
                buckets,
            } => Pagination::Offset {
                limit,
                stride,
                buckets,
            },
            PaginationConfig::Page { buckets } => Pagination::Page { buckets },
        }
    }
}

/// One backend service under comparative measurement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    name: String,
    base_url: Url,
    path: String,
    pagination: Pagination,
}

impl Target {
    /// Build a target from a base URL such as `http://localhost:3001`
    pub fn new(
        name: impl Into<String>,
        base_url: &str,
        path: impl Into<String>,
        pagination: Pagination,
    ) -> Result<Self> {
        let name = name.into();
        let base_url = Url::parse(base_url).map_err(|e| BenchError::InvalidTarget {
            name: name.clone(),
            message: format!("{}: {}", base_url, e),
        })?;

        if base_url.cannot_be_a_base() || base_url.host_str().is_none() {
            return Err(BenchError::InvalidTarget {
                name,
                message: format!("{} has no host", base_url),
            });
        }

        if pagination.buckets() == 0 {
            return Err(BenchError::InvalidTarget {
                name,
                message: "pagination needs at least one bucket".to_string(),
            });
        }

        Ok(Self {
            name,
            base_url,
            path: path.into(),
            pagination,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// URL of `path` on this target's host
    pub fn url_for(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url
    }

    /// URL of the endpoint under test, without query parameters
    pub fn endpoint(&self) -> Url {
        self.url_for(&self.path)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.endpoint())
    }
}

impl TryFrom<&TargetConfig> for Target {
    type Error = BenchError;

    fn try_from(config: &TargetConfig) -> Result<Self> {
        Target::new(
            config.name.clone(),
            &format!("{}://{}:{}", config.scheme, config.host, config.port),
            config.path.clone(),
            config.pagination.into(),
        )
    }
}

/// Ordered, fixed list of targets benchmarked in a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetRegistry {
    targets: Vec<Target>,
}

impl TargetRegistry {
    pub fn new(targets: Vec<Target>) -> Self {
        Self { targets }
    }

    pub fn from_config(configs: &[TargetConfig]) -> Result<Self> {
        let targets = configs
            .iter()
            .map(Target::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(targets))
    }

    pub fn get(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }

    /// Registry restricted to `names`, keeping registry order
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        if let Some(unknown) = names.iter().find(|n| self.get(n.as_ref()).is_none()) {
            return Err(BenchError::UnknownTarget(unknown.as_ref().to_string()));
        }

        let targets = self
            .targets
            .iter()
            .filter(|t| names.iter().any(|n| n.as_ref() == t.name))
            .cloned()
            .collect();
        Ok(Self::new(targets))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
