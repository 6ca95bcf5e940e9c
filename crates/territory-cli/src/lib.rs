//! # territory-cli — Command-Line Interface
//!
//! Provides the `territory` binary. Each invocation loads the location
//! catalog and the distributor state, runs one command, and writes the state
//! back if the command mutated it.
//!
//! ## Subcommands
//!
//! - `territory add-distributor` — Register a distributor under an optional parent.
//! - `territory add-permission` — Add an include or exclude rule.
//! - `territory check` — Decide whether a distributor may operate in a region.
//! - `territory list` — Print every distributor and its rules.
//!
//! ```bash
//! territory add-distributor --name DIST1
//! territory add-permission --name DIST1 --region IN
//! territory add-permission --name DIST1 --region KA-IN --kind exclude
//! territory add-distributor --name DIST2 --parent DIST1
//! territory check --name DIST2 --region CHN-TN-IN
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the engine; handlers delegate to
//!   `territory-core` and only format output.
//! - `check` and `list` never write the state file.

pub mod check;
pub mod distributor;
pub mod list;
pub mod permission;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use territory_core::{DistributionSystem, RegionCatalog, StateStore, TerritoryConfig};

/// Build the effective configuration: the optional YAML file, then
/// command-line path overrides.
pub fn resolve_config(
    config_file: Option<&Path>,
    catalog: Option<PathBuf>,
    state: Option<PathBuf>,
) -> Result<TerritoryConfig> {
    let mut config = match config_file {
        Some(path) => TerritoryConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => TerritoryConfig::default(),
    };
    if let Some(catalog) = catalog {
        config.catalog = catalog;
    }
    if let Some(state) = state {
        config.state = state;
    }
    Ok(config)
}

/// A loaded system plus the store it was read from.
#[derive(Debug)]
pub struct Workspace {
    /// The in-memory catalog and graph.
    pub system: DistributionSystem,
    /// Where the graph is persisted.
    pub store: StateStore,
}

impl Workspace {
    /// Load the catalog and distributor state named by `config`.
    ///
    /// A catalog that cannot be read aborts; a missing state file is an
    /// empty graph.
    pub fn open(config: &TerritoryConfig) -> Result<Self> {
        let catalog = RegionCatalog::load(&config.catalog).with_context(|| {
            format!("failed to load location catalog {}", config.catalog.display())
        })?;
        let store = StateStore::new(&config.state);
        let graph = store.load().with_context(|| {
            format!("failed to load distributor state {}", config.state.display())
        })?;
        tracing::info!(
            regions = catalog.len(),
            distributors = graph.len(),
            "workspace loaded"
        );
        Ok(Self {
            system: DistributionSystem::new(Arc::new(catalog), graph, config.permissions),
            store,
        })
    }

    /// Write the full graph back to the store.
    pub fn persist(&self) -> Result<()> {
        self.store
            .save(self.system.graph())
            .with_context(|| format!("failed to save state {}", self.store.path().display()))
    }
}
