//! Identity source: the pool of user ids placed in generated requests

use crate::error::{BenchError, Result};
use crate::target::TargetRegistry;
use cmpbench_config::IdentityConfig;
use cmpbench_http::{GeneratedRequest, HttpClient};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// User identifier sent in the `X-User-Id` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(pub i64);

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Identity {
    fn from(id: i64) -> Self {
        Identity(id)
    }
}

/// Element of the identity endpoint's JSON array; extra fields are ignored
#[derive(Debug, Deserialize)]
struct IdentityRecord {
    id: Identity,
}

/// Parse `[{"id": 1}, {"id": 2}, ...]` into identities, keeping order
pub fn parse_identities(body: &[u8]) -> Result<Vec<Identity>> {
    let records: Vec<IdentityRecord> = serde_json::from_slice(body)?;
    Ok(records.into_iter().map(|r| r.id).collect())
}

/// Draw one identity uniformly at random
pub fn random_identity<R: Rng + ?Sized>(ids: &[Identity], rng: &mut R) -> Result<Identity> {
    ids.choose(rng).copied().ok_or(BenchError::NoIdentities)
}

/// Fetches the list of valid identities from one target
pub struct IdentitySource {
    client: Arc<dyn HttpClient>,
    url: Url,
}

impl IdentitySource {
    pub fn new(client: Arc<dyn HttpClient>, url: Url) -> Self {
        Self { client, url }
    }

    /// Resolve the configured identity target against the registry
    pub fn from_config(
        client: Arc<dyn HttpClient>,
        registry: &TargetRegistry,
        config: &IdentityConfig,
    ) -> Result<Self> {
        let target = registry
            .get(&config.target)
            .ok_or_else(|| BenchError::UnknownTarget(config.target.clone()))?;
        Ok(Self::new(client, target.url_for(&config.path)))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// One unauthenticated GET; no retries, an empty list is an error
    pub async fn fetch_identities(&self) -> Result<Vec<Identity>> {
        debug!("Fetching identities from {}", self.url);

        let response = self
            .client
            .execute(GeneratedRequest::get(self.url.clone()))
            .await?;
        let body = response.read_all().await?;
        let identities = parse_identities(&body)?;

        if identities.is_empty() {
            return Err(BenchError::NoIdentities);
        }

        info!("Fetched {} identities from {}", identities.len(), self.url);
        Ok(identities)
    }
}
