//! # Error Hierarchy
//!
//! Structured error types for the territory engine, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Every error is reported synchronously by the operation that detected it.
//! A rejected mutation leaves the distributor graph unchanged.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the territory engine.
#[derive(Error, Debug)]
pub enum TerritoryError {
    /// A graph or permission operation was rejected.
    #[error(transparent)]
    Permission(#[from] PermissionError),

    /// Domain primitive validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The location catalog could not be loaded.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The distributor state could not be loaded or saved.
    #[error("state store error: {0}")]
    Store(#[from] StoreError),

    /// The configuration file could not be read or parsed.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Rejections raised by the distributor graph and the permission engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    /// A distributor with this name is already registered.
    #[error("distributor {0} already exists")]
    DuplicateDistributor(String),

    /// No distributor with this name is registered.
    #[error("distributor {0} does not exist")]
    UnknownDistributor(String),

    /// The named parent is not registered.
    #[error("parent distributor {0} does not exist")]
    UnknownParent(String),

    /// The region code is not a key of the location catalog.
    #[error("invalid region code: {0}")]
    UnknownRegion(String),

    /// The parent does not authorize the region, so the child may not claim it.
    #[error("parent distributor {parent} does not have permission for {region} (requested by {distributor})")]
    ParentDenial {
        /// The distributor whose rule set was being changed.
        distributor: String,
        /// The parent that refused.
        parent: String,
        /// The region code being added.
        region: String,
    },

    /// The exact code already sits in the opposite rule set.
    #[error("distributor {distributor} already has {region} as an {existing} rule")]
    ContradictoryRule {
        /// The distributor whose rule set was being changed.
        distributor: String,
        /// The region code being added.
        region: String,
        /// The kind of the rule already present (`include` or `exclude`).
        existing: String,
    },
}

/// Validation errors for domain primitives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Distributor names must be non-empty.
    #[error("invalid distributor name: must be non-empty")]
    EmptyDistributorName,

    /// Region codes must be non-empty.
    #[error("invalid region code: must be non-empty")]
    EmptyRegionCode,

    /// Permission kind was neither `include` nor `exclude`.
    #[error("invalid permission kind: \"{0}\" (expected include or exclude)")]
    InvalidPermissionKind(String),
}

/// Failures while loading the location gazetteer.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The gazetteer file could not be opened.
    #[error("cannot read catalog {path}: {source}")]
    Io {
        /// The gazetteer path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The CSV stream could not be decoded.
    #[error("malformed catalog data: {0}")]
    Csv(#[from] csv::Error),

    /// The gazetteer has no header row.
    #[error("catalog has no header row")]
    MissingHeader,

    /// The header row has fewer columns than a gazetteer row needs.
    #[error("malformed catalog header: expected 6 columns, found {fields}")]
    MalformedHeader {
        /// Number of header columns found.
        fields: usize,
    },
}

/// Failures while loading or saving distributor state.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O failure on the state file.
    #[error("cannot access state file {path}: {source}")]
    Io {
        /// The state file path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The state document is not valid JSON of the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Stored parent links form a cycle.
    #[error("stored parent links form a cycle through distributor {0}")]
    CyclicParent(String),

    /// A stored record carried an invalid primitive.
    #[error("invalid stored record: {0}")]
    Validation(#[from] ValidationError),
}

/// Failures while reading the YAML configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config {path}: {source}")]
    Io {
        /// The configuration path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML of the expected shape.
    #[error("malformed config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
