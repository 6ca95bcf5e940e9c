//! # Permission Engine
//!
//! Authorization is the logical AND of "this distributor includes the
//! region and does not exclude it" and "every ancestor authorizes it too".
//! A child grant can only narrow its parent's territory, never widen it.
//!
//! Evaluation is lazy: nothing is cached, so a change to a parent's rules
//! is visible to every descendant on the next query. The ancestor chain is
//! walked with a loop rather than recursion.
//!
//! ## Mutation invariant
//!
//! Adding an include to a child requires the parent to already authorize
//! the region. Whether excludes are gated the same way is controlled by
//! [`PermissionPolicy::gate_excludes`].

use serde::{Deserialize, Serialize};

use crate::distributor::{DistributorId, PermissionKind, RuleMatch};
use crate::error::PermissionError;
use crate::graph::DistributorGraph;
use crate::region::RegionCode;

/// What to do when a rule is added whose exact code already sits in the
/// opposite rule set of the same distributor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContradictionPolicy {
    /// Accept the rule and log a warning. Exclude still wins at evaluation.
    #[default]
    Allow,
    /// Reject with [`PermissionError::ContradictoryRule`].
    Reject,
}

/// Rule-mutation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionPolicy {
    /// Also require parent authorization before adding an exclude rule.
    pub gate_excludes: bool,
    /// Handling of a code present in both rule sets.
    pub contradictions: ContradictionPolicy,
}

impl PermissionPolicy {
    /// Whether adding a rule of `kind` must pass the parent check.
    pub fn requires_parent_check(&self, kind: PermissionKind) -> bool {
        match kind {
            PermissionKind::Include => true,
            PermissionKind::Exclude => self.gate_excludes,
        }
    }
}

/// Result of evaluating a region against a distributor and its ancestors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Every distributor in the chain includes the region.
    Granted,
    /// A distributor in the chain excludes the region.
    Excluded {
        /// The distributor holding the exclude rule.
        distributor: String,
        /// The matching exclude rule.
        rule: RegionCode,
    },
    /// A distributor in the chain has no include covering the region.
    NotIncluded {
        /// The distributor lacking a matching include.
        distributor: String,
    },
}

impl Verdict {
    /// Whether the region is authorized.
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Granted => f.write_str("granted"),
            Self::Excluded { distributor, rule } => {
                write!(f, "excluded by {distributor} (rule {rule})")
            }
            Self::NotIncluded { distributor } => {
                write!(f, "not included by {distributor}")
            }
        }
    }
}

impl DistributorGraph {
    /// Evaluate `region` for `id`, naming the distributor that decided a denial.
    ///
    /// Each distributor in the chain is consulted nearest-first: an exclude
    /// match or a missing include ends the walk with a denial; an include
    /// match defers to the parent. Running off the root grants.
    pub fn explain(&self, id: DistributorId, region: &RegionCode) -> Verdict {
        let mut current = self.get(id);
        if current.is_none() {
            return Verdict::NotIncluded {
                distributor: id.to_string(),
            };
        }

        while let Some(node) = current {
            match node.evaluate(region) {
                RuleMatch::Excluded(rule) => {
                    tracing::debug!(distributor = node.name(), %region, %rule, "region excluded");
                    return Verdict::Excluded {
                        distributor: node.name().to_string(),
                        rule: rule.clone(),
                    };
                }
                RuleMatch::Unmatched => {
                    tracing::debug!(distributor = node.name(), %region, "no include rule matched");
                    return Verdict::NotIncluded {
                        distributor: node.name().to_string(),
                    };
                }
                RuleMatch::Included(rule) => {
                    tracing::trace!(distributor = node.name(), %region, %rule, "region included");
                    current = node.parent().and_then(|p| self.get(p));
                }
            }
        }

        Verdict::Granted
    }

    /// Whether `id` is authorized for `region`.
    pub fn has_permission(&self, id: DistributorId, region: &RegionCode) -> bool {
        self.explain(id, region).is_granted()
    }

    /// Add a rule to `id`, enforcing that a child never claims territory
    /// its parent does not authorize.
    ///
    /// On rejection the rule sets are left unchanged. Adding a rule that is
    /// already present is a no-op success.
    ///
    /// # Errors
    ///
    /// - [`PermissionError::UnknownDistributor`] if `id` is not in this graph.
    /// - [`PermissionError::ParentDenial`] if the parent check applies and fails.
    /// - [`PermissionError::ContradictoryRule`] under [`ContradictionPolicy::Reject`].
    pub fn add_permission(
        &mut self,
        id: DistributorId,
        region: RegionCode,
        kind: PermissionKind,
        policy: &PermissionPolicy,
    ) -> Result<(), PermissionError> {
        let node = self
            .get(id)
            .ok_or_else(|| PermissionError::UnknownDistributor(id.to_string()))?;

        if policy.requires_parent_check(kind) {
            if let Some(parent_id) = node.parent() {
                if !self.has_permission(parent_id, &region) {
                    return Err(PermissionError::ParentDenial {
                        distributor: node.name().to_string(),
                        parent: self.parent_name(id).unwrap_or_default().to_string(),
                        region: region.to_string(),
                    });
                }
            }
        }

        let opposite = kind.opposite();
        if node.rules(opposite).contains(&region) {
            match policy.contradictions {
                ContradictionPolicy::Allow => tracing::warn!(
                    distributor = node.name(),
                    %region,
                    existing = %opposite,
                    "region is now both included and excluded; exclude wins"
                ),
                ContradictionPolicy::Reject => {
                    return Err(PermissionError::ContradictoryRule {
                        distributor: node.name().to_string(),
                        region: region.to_string(),
                        existing: opposite.to_string(),
                    });
                }
            }
        }

        let node = self
            .get_mut(id)
            .ok_or_else(|| PermissionError::UnknownDistributor(id.to_string()))?;
        let name = node.name().to_string();
        if node.insert_rule(region.clone(), kind) {
            tracing::debug!(distributor = %name, %region, %kind, "added rule");
        }
        Ok(())
    }
}
