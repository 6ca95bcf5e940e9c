//! # Distribution System
//!
//! Facade over the location catalog and the distributor graph. Operations
//! are keyed by distributor name and raw region code; the facade resolves
//! names, checks region codes against the catalog, and delegates to the
//! graph. Every operation is a plain function of the current state and its
//! inputs: no retries, no partial application.
//!
//! The catalog is shared as `Arc<RegionCatalog>` and never mutated after
//! construction.

use std::sync::Arc;

use crate::catalog::{Location, RegionCatalog};
use crate::distributor::{DistributorId, PermissionKind};
use crate::error::{PermissionError, TerritoryError};
use crate::graph::DistributorGraph;
use crate::permission::{PermissionPolicy, Verdict};
use crate::region::RegionCode;

/// Catalog + graph + mutation policy.
#[derive(Debug, Clone)]
pub struct DistributionSystem {
    catalog: Arc<RegionCatalog>,
    graph: DistributorGraph,
    policy: PermissionPolicy,
}

impl DistributionSystem {
    /// Assemble a system from a loaded catalog and graph.
    pub fn new(
        catalog: Arc<RegionCatalog>,
        graph: DistributorGraph,
        policy: PermissionPolicy,
    ) -> Self {
        Self {
            catalog,
            graph,
            policy,
        }
    }

    /// The distributor graph.
    pub fn graph(&self) -> &DistributorGraph {
        &self.graph
    }

    /// Register a distributor. An empty or absent `parent` makes a root.
    pub fn add_distributor(
        &mut self,
        name: &str,
        parent: Option<&str>,
    ) -> Result<DistributorId, TerritoryError> {
        self.graph.add_distributor(name, parent)
    }

    /// Add an include or exclude rule to the named distributor.
    ///
    /// # Errors
    ///
    /// `UnknownDistributor`, `UnknownRegion`, `ParentDenial`, or
    /// `ContradictoryRule` under the reject policy.
    pub fn add_permission(
        &mut self,
        name: &str,
        region: &str,
        kind: PermissionKind,
    ) -> Result<(), TerritoryError> {
        let id = self.graph.resolve(name)?;
        let region = self.known_region(region)?;
        self.graph.add_permission(id, region, kind, &self.policy)?;
        Ok(())
    }

    /// Whether the named distributor is authorized for `region`.
    pub fn check_permission(&self, name: &str, region: &str) -> Result<bool, TerritoryError> {
        Ok(self.explain_permission(name, region)?.is_granted())
    }

    /// Evaluate `region` for the named distributor, naming who decided.
    ///
    /// Unknown names and unknown regions are rejected before any rule is
    /// evaluated.
    pub fn explain_permission(&self, name: &str, region: &str) -> Result<Verdict, TerritoryError> {
        let id = self.graph.resolve(name)?;
        let region = self.known_region(region)?;
        Ok(self.graph.explain(id, &region))
    }

    /// Whether `code` is a catalog key.
    pub fn validate_region(&self, code: &str) -> bool {
        self.catalog.contains(code)
    }

    /// The location indexed under `code`.
    pub fn location(&self, code: &str) -> Option<&Location> {
        self.catalog.get(code)
    }

    fn known_region(&self, code: &str) -> Result<RegionCode, TerritoryError> {
        if !self.validate_region(code) {
            return Err(PermissionError::UnknownRegion(code.to_string()).into());
        }
        Ok(RegionCode::new(code)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAZETTEER: &str = "\
city,province,country,city_name,province_name,country_name
LA,CA,US,Los Angeles,California,United States
NYC,NY,US,New York City,New York,United States
PAR,IDF,FR,Paris,Ile-de-France,France
";

    fn system() -> DistributionSystem {
        let catalog = RegionCatalog::from_reader(GAZETTEER.as_bytes()).unwrap();
        DistributionSystem::new(
            Arc::new(catalog),
            DistributorGraph::new(),
            PermissionPolicy::default(),
        )
    }

    #[test]
    fn end_to_end_hierarchy() {
        let mut sys = system();
        sys.add_distributor("DIST1", None).unwrap();
        sys.add_distributor("DIST2", Some("DIST1")).unwrap();
        sys.add_permission("DIST1", "US", PermissionKind::Include)
            .unwrap();
        sys.add_permission("DIST2", "CA-US", PermissionKind::Include)
            .unwrap();

        assert!(sys.check_permission("DIST1", "NYC-NY-US").unwrap());
        assert!(sys.check_permission("DIST2", "LA-CA-US").unwrap());
        assert!(!sys.check_permission("DIST2", "NY-US").unwrap());
        assert!(!sys.check_permission("DIST1", "FR").unwrap());
    }

    #[test]
    fn unknown_region_rejected_on_check() {
        let mut sys = system();
        sys.add_distributor("DIST1", None).unwrap();
        let err = sys.check_permission("DIST1", "XX-YY").unwrap_err();
        assert!(matches!(
            err,
            TerritoryError::Permission(PermissionError::UnknownRegion(ref c)) if c == "XX-YY"
        ));
    }

    #[test]
    fn unknown_region_rejected_on_add() {
        let mut sys = system();
        sys.add_distributor("DIST1", None).unwrap();
        let err = sys
            .add_permission("DIST1", "ZZ", PermissionKind::Include)
            .unwrap_err();
        assert!(matches!(
            err,
            TerritoryError::Permission(PermissionError::UnknownRegion(_))
        ));
        assert!(sys.graph().by_name("DIST1").unwrap().includes().is_empty());
    }

    #[test]
    fn unknown_distributor_rejected() {
        let mut sys = system();
        assert!(matches!(
            sys.add_permission("ghost", "US", PermissionKind::Include),
            Err(TerritoryError::Permission(PermissionError::UnknownDistributor(_)))
        ));
        assert!(matches!(
            sys.check_permission("ghost", "US"),
            Err(TerritoryError::Permission(PermissionError::UnknownDistributor(_)))
        ));
    }

    #[test]
    fn parent_denial_surfaces_through_facade() {
        let mut sys = system();
        sys.add_distributor("DIST1", None).unwrap();
        sys.add_distributor("DIST2", Some("DIST1")).unwrap();
        sys.add_permission("DIST1", "US", PermissionKind::Include)
            .unwrap();
        assert!(matches!(
            sys.add_permission("DIST2", "FR", PermissionKind::Include),
            Err(TerritoryError::Permission(PermissionError::ParentDenial { .. }))
        ));
    }

    #[test]
    fn explain_names_excluding_ancestor() {
        let mut sys = system();
        sys.add_distributor("DIST1", None).unwrap();
        sys.add_distributor("DIST2", Some("DIST1")).unwrap();
        sys.add_permission("DIST1", "US", PermissionKind::Include)
            .unwrap();
        sys.add_permission("DIST2", "US", PermissionKind::Include)
            .unwrap();
        sys.add_permission("DIST1", "NY-US", PermissionKind::Exclude)
            .unwrap();

        let verdict = sys.explain_permission("DIST2", "NYC-NY-US").unwrap();
        assert_eq!(
            verdict,
            Verdict::Excluded {
                distributor: "DIST1".to_string(),
                rule: RegionCode::new("NY-US").unwrap(),
            }
        );
    }

    #[test]
    fn location_lookup() {
        let sys = system();
        assert!(sys.validate_region("IDF-FR"));
        assert!(!sys.validate_region("IDF"));
        assert_eq!(sys.location("LA-CA-US").unwrap().city_name, "Los Angeles");
    }
}
