//! Identity source configuration

use crate::error::ConfigResult;
use crate::validation::{validate_path, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};

/// Where the list of valid user ids is fetched from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IdentityConfig {
    /// Name of the configured target serving the id list
    pub target: String,

    /// Path of the "list identities" endpoint on that target
    pub path: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            target: "sinatra".to_string(),
            path: "/api/v1/user_ids".to_string(),
        }
    }
}

impl Validatable for IdentityConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.target, "target", self.domain_name())?;
        validate_path(&self.path, "path", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "identity"
    }
}
