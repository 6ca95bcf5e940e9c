//! # List Subcommand
//!
//! Prints every distributor, its parent and its rules, sorted by name.
//! Never writes state.

use anyhow::Result;
use clap::Args;

use territory_core::DistributorGraph;

use crate::Workspace;

/// Arguments for `territory list`.
#[derive(Args, Debug)]
pub struct ListArgs {}

/// Execute `territory list`.
pub fn run_list(_args: &ListArgs, workspace: &Workspace) -> Result<u8> {
    print!("{}", render_list(workspace.system.graph()));
    Ok(0)
}

/// Format the distributor listing.
pub fn render_list(graph: &DistributorGraph) -> String {
    let mut out = String::from("Registered Distributors:\n");
    if graph.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }

    for (id, node) in graph.iter() {
        let parent = graph.parent_name(id).unwrap_or("none");
        out.push_str(&format!("- {} (Parent: {parent})\n", node.name()));
        out.push_str("  Includes:\n");
        for region in node.includes() {
            out.push_str(&format!("    - {region}\n"));
        }
        out.push_str("  Excludes:\n");
        for region in node.excludes() {
            out.push_str(&format!("    - {region}\n"));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use territory_core::{PermissionKind, PermissionPolicy};

    #[test]
    fn empty_listing() {
        assert_eq!(
            render_list(&DistributorGraph::new()),
            "Registered Distributors:\n  (none)\n"
        );
    }

    #[test]
    fn listing_is_sorted_with_parents() {
        let policy = PermissionPolicy::default();
        let mut graph = DistributorGraph::new();
        let b = graph.add_distributor("B", None).unwrap();
        let a = graph.add_distributor("A", Some("B")).unwrap();
        graph
            .add_permission(b, "US".parse().unwrap(), PermissionKind::Include, &policy)
            .unwrap();
        graph
            .add_permission(a, "CA-US".parse().unwrap(), PermissionKind::Include, &policy)
            .unwrap();
        graph
            .add_permission(a, "LA-CA-US".parse().unwrap(), PermissionKind::Exclude, &policy)
            .unwrap();

        let out = render_list(&graph);
        let expected = "\
Registered Distributors:
- A (Parent: B)
  Includes:
    - CA-US
  Excludes:
    - LA-CA-US

- B (Parent: none)
  Includes:
    - US
  Excludes:

";
        assert_eq!(out, expected);
    }
}
