#![deny(missing_docs)]

//! # territory-core — Distributor Territory Permission Engine
//!
//! Decides whether a named distributor may operate in a region. Distributors
//! form a forest; each carries include and exclude rules keyed by region
//! code, and a child is only ever authorized where its parent is.
//!
//! ## Components
//!
//! - [`RegionCode`] and containment (`LA-CA-US` lies within `CA-US` and `US`).
//! - [`RegionCatalog`] — read-only index of known codes, loaded from a
//!   gazetteer CSV.
//! - [`DistributorGraph`] — name-indexed forest of [`Distributor`] nodes
//!   with handle-based parent links.
//! - Permission engine — [`DistributorGraph::explain`],
//!   [`DistributorGraph::has_permission`], [`DistributorGraph::add_permission`].
//! - [`StateStore`] — JSON persistence of the graph.
//! - [`DistributionSystem`] — name-keyed facade over catalog and graph.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Single-threaded: the graph carries no internal locking. A long-lived
//!   service must serialize access itself.

pub mod catalog;
pub mod config;
pub mod distributor;
pub mod error;
pub mod graph;
pub mod permission;
pub mod region;
pub mod store;
pub mod system;

// Re-export primary types at crate root for ergonomic imports.
pub use catalog::{Location, RegionCatalog};
pub use config::TerritoryConfig;
pub use distributor::{Distributor, DistributorId, PermissionKind, RuleMatch};
pub use error::{
    CatalogError, ConfigError, PermissionError, StoreError, TerritoryError, ValidationError,
};
pub use graph::DistributorGraph;
pub use permission::{ContradictionPolicy, PermissionPolicy, Verdict};
pub use region::{is_subregion, RegionCode, RegionLevel};
pub use store::{DistributorRecord, StateDocument, StateStore};
pub use system::DistributionSystem;
