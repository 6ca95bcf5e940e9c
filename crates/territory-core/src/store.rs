//! # Distributor State Store
//!
//! Persists the distributor graph as a single JSON document: an object keyed
//! by distributor name whose values carry the name, the parent's name (empty
//! for roots) and both rule sets as `code -> true` maps.
//!
//! ```json
//! {
//!     "DIST1": {
//!         "Name": "DIST1",
//!         "ParentName": "",
//!         "Includes": { "US": true },
//!         "Excludes": { "CA-US": true }
//!     }
//! }
//! ```
//!
//! The lifecycle is load once, mutate in memory, save once. Loading is two
//! passes (all nodes first, then parent links) so records may appear in any
//! order. A missing or empty file is an empty graph. Saving never touches
//! the in-memory graph, so a failed save leaves the applied mutation intact.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::distributor::{Distributor, DistributorId, PermissionKind};
use crate::error::StoreError;
use crate::graph::DistributorGraph;
use crate::region::RegionCode;

/// One stored distributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributorRecord {
    /// Distributor name.
    #[serde(rename = "Name", default)]
    pub name: String,
    /// Parent name; empty for roots.
    #[serde(rename = "ParentName", default)]
    pub parent_name: String,
    /// Include rules. Every key is a rule regardless of its value.
    #[serde(rename = "Includes", default, deserialize_with = "nullable_rules")]
    pub includes: BTreeMap<String, bool>,
    /// Exclude rules. Every key is a rule regardless of its value.
    #[serde(rename = "Excludes", default, deserialize_with = "nullable_rules")]
    pub excludes: BTreeMap<String, bool>,
}

/// The whole stored document, keyed by distributor name.
pub type StateDocument = BTreeMap<String, DistributorRecord>;

fn nullable_rules<'de, D>(deserializer: D) -> Result<BTreeMap<String, bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<BTreeMap<String, bool>>::deserialize(deserializer)?.unwrap_or_default())
}

/// File-backed JSON store for the distributor graph.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// A store backed by `path`. Nothing is read until [`load`](Self::load).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the graph. A missing or blank file yields an empty graph.
    ///
    /// # Errors
    ///
    /// I/O failures other than not-found, malformed JSON, invalid stored
    /// names or codes, and parent cycles.
    pub fn load(&self) -> Result<DistributorGraph, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no state file; starting empty");
                return Ok(DistributorGraph::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(DistributorGraph::new());
        }

        let document: StateDocument = serde_json::from_str(&content)?;
        let graph = graph_from_document(&document)?;
        tracing::debug!(
            path = %self.path.display(),
            distributors = graph.len(),
            "loaded distributor state"
        );
        Ok(graph)
    }

    /// Write the full graph, replacing the file.
    pub fn save(&self, graph: &DistributorGraph) -> Result<(), StoreError> {
        let document = document_from_graph(graph);

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        document.serialize(&mut serializer)?;
        buf.push(b'\n');

        std::fs::write(&self.path, buf).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(
            path = %self.path.display(),
            distributors = graph.len(),
            "saved distributor state"
        );
        Ok(())
    }
}

/// Snapshot a graph as a stored document.
pub fn document_from_graph(graph: &DistributorGraph) -> StateDocument {
    graph
        .iter()
        .map(|(id, node)| {
            let rules = |kind: PermissionKind| -> BTreeMap<String, bool> {
                node.rules(kind)
                    .iter()
                    .map(|code| (code.to_string(), true))
                    .collect()
            };
            let record = DistributorRecord {
                name: node.name().to_string(),
                parent_name: graph.parent_name(id).unwrap_or_default().to_string(),
                includes: rules(PermissionKind::Include),
                excludes: rules(PermissionKind::Exclude),
            };
            (node.name().to_string(), record)
        })
        .collect()
}

/// Rebuild a graph from a stored document.
///
/// The map key is authoritative for the name. A parent name that matches no
/// record is dropped with a warning and the distributor becomes a root.
pub fn graph_from_document(document: &StateDocument) -> Result<DistributorGraph, StoreError> {
    let mut graph = DistributorGraph::new();

    for (name, record) in document {
        let mut node = Distributor::new(name.as_str(), None)?;
        for (code, kind) in record
            .includes
            .keys()
            .map(|c| (c, PermissionKind::Include))
            .chain(record.excludes.keys().map(|c| (c, PermissionKind::Exclude)))
        {
            node.insert_rule(RegionCode::new(code.as_str())?, kind);
        }
        graph.insert_unlinked(node);
    }

    for (name, record) in document {
        if record.parent_name.is_empty() {
            continue;
        }
        let Some(parent) = graph.id_of(&record.parent_name) else {
            tracing::warn!(
                distributor = %name,
                parent = %record.parent_name,
                "stored parent does not exist; treating distributor as a root"
            );
            continue;
        };
        if let Some(node) = graph.id_of(name).and_then(|child| graph.get_mut(child)) {
            node.set_parent(Some(parent));
        }
    }

    check_acyclic(&graph)?;
    Ok(graph)
}

/// Reject parent links that loop back on themselves.
fn check_acyclic(graph: &DistributorGraph) -> Result<(), StoreError> {
    let limit = graph.len();
    for (id, node) in graph.iter() {
        let mut steps = 0usize;
        let mut current: Option<DistributorId> = node.parent();
        while let Some(parent) = current {
            steps += 1;
            if parent == id || steps > limit {
                return Err(StoreError::CyclicParent(node.name().to_string()));
            }
            current = graph.get(parent).and_then(|p| p.parent());
        }
    }
    Ok(())
}
