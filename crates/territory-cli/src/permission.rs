//! # Add-Permission Subcommand
//!
//! Adds an include or exclude rule to a distributor and saves the state.
//! Includes on a child are rejected unless the parent already authorizes
//! the region.

use anyhow::Result;
use clap::Args;

use territory_core::PermissionKind;

use crate::Workspace;

/// Arguments for `territory add-permission`.
#[derive(Args, Debug)]
pub struct AddPermissionArgs {
    /// Distributor name.
    #[arg(long)]
    pub name: String,

    /// Region code: COUNTRY, PROVINCE-COUNTRY or CITY-PROVINCE-COUNTRY.
    #[arg(long)]
    pub region: String,

    /// Rule kind: include or exclude.
    #[arg(long, alias = "type", default_value = "include")]
    pub kind: PermissionKind,
}

/// Execute `territory add-permission`.
pub fn run_add_permission(args: &AddPermissionArgs, workspace: &mut Workspace) -> Result<u8> {
    workspace
        .system
        .add_permission(&args.name, &args.region, args.kind)?;
    println!(
        "OK: added {} permission for {} to {}",
        args.kind, args.region, args.name
    );

    workspace.persist()?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributor::{run_add_distributor, AddDistributorArgs};
    use crate::testing;

    fn add(ws: &mut Workspace, name: &str, region: &str, kind: PermissionKind) -> Result<u8> {
        run_add_permission(
            &AddPermissionArgs {
                name: name.to_string(),
                region: region.to_string(),
                kind,
            },
            ws,
        )
    }

    fn register(ws: &mut Workspace, name: &str, parent: Option<&str>) {
        run_add_distributor(
            &AddDistributorArgs {
                name: name.to_string(),
                parent: parent.map(str::to_string),
            },
            ws,
        )
        .unwrap();
    }

    #[test]
    fn include_and_exclude_persist() {
        let dir = tempfile::tempdir().unwrap();
        let config = testing::config_in(dir.path());

        let mut ws = testing::open(&config);
        register(&mut ws, "DIST1", None);
        add(&mut ws, "DIST1", "IN", PermissionKind::Include).unwrap();
        add(&mut ws, "DIST1", "KA-IN", PermissionKind::Exclude).unwrap();

        let ws = testing::open(&config);
        assert!(ws.system.check_permission("DIST1", "CHN-TN-IN").unwrap());
        assert!(!ws.system.check_permission("DIST1", "BLR-KA-IN").unwrap());
    }

    #[test]
    fn parent_denial_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let config = testing::config_in(dir.path());

        let mut ws = testing::open(&config);
        register(&mut ws, "DIST1", None);
        add(&mut ws, "DIST1", "IN", PermissionKind::Include).unwrap();
        register(&mut ws, "DIST2", Some("DIST1"));
        let before = std::fs::read_to_string(&config.state).unwrap();

        let mut ws = testing::open(&config);
        let err = add(&mut ws, "DIST2", "US", PermissionKind::Include).unwrap_err();
        assert!(err.to_string().contains("does not have permission"));
        assert_eq!(std::fs::read_to_string(&config.state).unwrap(), before);
    }

    #[test]
    fn unknown_region_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = testing::config_in(dir.path());

        let mut ws = testing::open(&config);
        register(&mut ws, "DIST1", None);
        let err = add(&mut ws, "DIST1", "XX", PermissionKind::Include).unwrap_err();
        assert!(err.to_string().contains("invalid region code: XX"));
    }

    #[test]
    fn kind_parses_from_command_line() {
        use clap::Parser;

        #[derive(Parser)]
        struct Harness {
            #[command(flatten)]
            args: AddPermissionArgs,
        }

        let h = Harness::parse_from(["t", "--name", "D", "--region", "IN"]);
        assert_eq!(h.args.kind, PermissionKind::Include);
        let h = Harness::parse_from(["t", "--name", "D", "--region", "IN", "--type", "exclude"]);
        assert_eq!(h.args.kind, PermissionKind::Exclude);
        assert!(Harness::try_parse_from(["t", "--name", "D", "--region", "IN", "--kind", "maybe"]).is_err());
    }
}
