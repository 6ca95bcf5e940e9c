//! # Configuration
//!
//! Optional YAML file naming the gazetteer and state paths and the
//! rule-mutation policy. Every field has a default, so an absent file and
//! an empty file behave the same.
//!
//! ```yaml
//! catalog: data/cities.csv
//! state: data/distributors.json
//! permissions:
//!   gate_excludes: false
//!   contradictions: allow
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::permission::PermissionPolicy;

/// Default gazetteer path.
pub const DEFAULT_CATALOG_PATH: &str = "cities.csv";

/// Default state file path.
pub const DEFAULT_STATE_PATH: &str = "distributors.json";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerritoryConfig {
    /// Gazetteer CSV path.
    pub catalog: PathBuf,
    /// Distributor state JSON path.
    pub state: PathBuf,
    /// Rule-mutation policy.
    pub permissions: PermissionPolicy,
}

impl Default for TerritoryConfig {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from(DEFAULT_CATALOG_PATH),
            state: PathBuf::from(DEFAULT_STATE_PATH),
            permissions: PermissionPolicy::default(),
        }
    }
}

impl TerritoryConfig {
    /// Read a YAML configuration file.
    ///
    /// Relative `catalog` and `state` paths are resolved against the
    /// directory holding the file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml(&content)?;
        if let Some(base) = path.parent() {
            config.catalog = resolve(base, &config.catalog);
            config.state = resolve(base, &config.state);
        }
        tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from YAML text. Blank text yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
