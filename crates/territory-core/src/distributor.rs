//! # Distributor Nodes
//!
//! A distributor is a named node of the distributor graph carrying two
//! rule sets keyed by region code: includes grant territory, excludes deny
//! it. The parent link is a [`DistributorId`] handle into the owning
//! [`DistributorGraph`](crate::graph::DistributorGraph), never an owning
//! pointer.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::region::RegionCode;

/// Handle to a distributor inside its graph.
///
/// Handles are minted by the graph on registration and stay valid for the
/// graph's lifetime; distributors are never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DistributorId(pub(crate) usize);

impl std::fmt::Display for DistributorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which rule set a region is added to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionKind {
    /// Grants the region, subject to every ancestor also granting it.
    Include,
    /// Denies the region outright.
    Exclude,
}

impl PermissionKind {
    /// The canonical string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Include => "include",
            Self::Exclude => "exclude",
        }
    }

    /// The other rule set.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Include => Self::Exclude,
            Self::Exclude => Self::Include,
        }
    }
}

impl std::fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PermissionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "include" => Ok(Self::Include),
            "exclude" => Ok(Self::Exclude),
            _ => Err(ValidationError::InvalidPermissionKind(s.to_string())),
        }
    }
}

/// Outcome of evaluating one distributor's own rules, ignoring ancestors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleMatch<'a> {
    /// An exclude rule contains the region.
    Excluded(&'a RegionCode),
    /// No exclude rule matched and this include rule contains the region.
    Included(&'a RegionCode),
    /// Neither rule set contains the region.
    Unmatched,
}

/// A distributor and its rule sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distributor {
    name: String,
    parent: Option<DistributorId>,
    includes: BTreeSet<RegionCode>,
    excludes: BTreeSet<RegionCode>,
}

impl Distributor {
    pub(crate) fn new(
        name: impl Into<String>,
        parent: Option<DistributorId>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyDistributorName);
        }
        Ok(Self {
            name,
            parent,
            includes: BTreeSet::new(),
            excludes: BTreeSet::new(),
        })
    }

    /// The distributor's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Handle of the parent distributor, if any.
    pub fn parent(&self) -> Option<DistributorId> {
        self.parent
    }

    /// Include rules, sorted.
    pub fn includes(&self) -> &BTreeSet<RegionCode> {
        &self.includes
    }

    /// Exclude rules, sorted.
    pub fn excludes(&self) -> &BTreeSet<RegionCode> {
        &self.excludes
    }

    /// The rule set of the given kind.
    pub fn rules(&self, kind: PermissionKind) -> &BTreeSet<RegionCode> {
        match kind {
            PermissionKind::Include => &self.includes,
            PermissionKind::Exclude => &self.excludes,
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<DistributorId>) {
        self.parent = parent;
    }

    /// Insert a rule. Returns `false` if it was already present.
    pub(crate) fn insert_rule(&mut self, region: RegionCode, kind: PermissionKind) -> bool {
        match kind {
            PermissionKind::Include => self.includes.insert(region),
            PermissionKind::Exclude => self.excludes.insert(region),
        }
    }

    /// Evaluate this distributor's own rules for `region`.
    ///
    /// Excludes are consulted first and win over any include. Any matching
    /// rule suffices, so the result does not depend on iteration order.
    pub fn evaluate(&self, region: &RegionCode) -> RuleMatch<'_> {
        if let Some(rule) = self.excludes.iter().find(|rule| region.is_within(rule)) {
            return RuleMatch::Excluded(rule);
        }
        match self.includes.iter().find(|rule| region.is_within(rule)) {
            Some(rule) => RuleMatch::Included(rule),
            None => RuleMatch::Unmatched,
        }
    }
}
