//! # Distributor Graph
//!
//! Owns every [`Distributor`] in a node table and indexes them by name.
//! Parent links are [`DistributorId`] handles into the same table, so the
//! graph is a forest: a parent must already exist when a child registers,
//! which rules out cycles by construction. Distributors are never removed.

use std::collections::BTreeMap;

use crate::distributor::{Distributor, DistributorId};
use crate::error::{PermissionError, TerritoryError};

/// Name-indexed forest of distributors.
#[derive(Debug, Clone, Default)]
pub struct DistributorGraph {
    nodes: Vec<Distributor>,
    by_name: BTreeMap<String, DistributorId>,
}

impl DistributorGraph {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a distributor under an optional parent.
    ///
    /// An empty `parent` name means no parent.
    ///
    /// # Errors
    ///
    /// - [`PermissionError::DuplicateDistributor`] if `name` is taken.
    /// - [`PermissionError::UnknownParent`] if `parent` is not registered.
    /// - A validation error if `name` is empty.
    pub fn add_distributor(
        &mut self,
        name: &str,
        parent: Option<&str>,
    ) -> Result<DistributorId, TerritoryError> {
        if self.by_name.contains_key(name) {
            return Err(PermissionError::DuplicateDistributor(name.to_string()).into());
        }

        let parent_id = match parent.filter(|p| !p.is_empty()) {
            Some(parent_name) => Some(
                self.id_of(parent_name)
                    .ok_or_else(|| PermissionError::UnknownParent(parent_name.to_string()))?,
            ),
            None => None,
        };

        let id = self.push(Distributor::new(name, parent_id)?);
        tracing::debug!(distributor = name, parent = ?parent, "registered distributor");
        Ok(id)
    }

    /// Insert a prepared node as-is. The state store builds nodes with
    /// their rules, then links parents in a second pass once every node
    /// exists; its names come from map keys and are therefore unique.
    pub(crate) fn insert_unlinked(&mut self, node: Distributor) -> DistributorId {
        debug_assert!(!self.by_name.contains_key(node.name()));
        self.push(node)
    }

    fn push(&mut self, node: Distributor) -> DistributorId {
        let id = DistributorId(self.nodes.len());
        self.by_name.insert(node.name().to_string(), id);
        self.nodes.push(node);
        id
    }

    /// Handle of the distributor named `name`.
    pub fn id_of(&self, name: &str) -> Option<DistributorId> {
        self.by_name.get(name).copied()
    }

    /// Handle of the distributor named `name`, or an `UnknownDistributor` error.
    pub fn resolve(&self, name: &str) -> Result<DistributorId, PermissionError> {
        self.id_of(name)
            .ok_or_else(|| PermissionError::UnknownDistributor(name.to_string()))
    }

    /// The distributor behind a handle.
    pub fn get(&self, id: DistributorId) -> Option<&Distributor> {
        self.nodes.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: DistributorId) -> Option<&mut Distributor> {
        self.nodes.get_mut(id.0)
    }

    /// The distributor named `name`.
    pub fn by_name(&self, name: &str) -> Option<&Distributor> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    /// Name of the parent of `id`, if it has one.
    pub fn parent_name(&self, id: DistributorId) -> Option<&str> {
        self.get(id)
            .and_then(Distributor::parent)
            .and_then(|p| self.get(p))
            .map(Distributor::name)
    }

    /// The node itself followed by its ancestors, nearest first.
    pub fn lineage(&self, id: DistributorId) -> impl Iterator<Item = &Distributor> + '_ {
        std::iter::successors(self.get(id), move |node| {
            node.parent().and_then(|p| self.get(p))
        })
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: DistributorId) -> impl Iterator<Item = &Distributor> + '_ {
        self.lineage(id).skip(1)
    }

    /// All distributors sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (DistributorId, &Distributor)> + '_ {
        self.by_name
            .values()
            .filter_map(move |&id| self.get(id).map(|node| (id, node)))
    }

    /// Number of distributors.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no distributors.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
