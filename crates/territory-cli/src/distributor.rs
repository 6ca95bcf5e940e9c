//! # Add-Distributor Subcommand
//!
//! Registers a distributor, optionally under an existing parent, and saves
//! the state.

use anyhow::Result;
use clap::Args;

use crate::Workspace;

/// Arguments for `territory add-distributor`.
#[derive(Args, Debug)]
pub struct AddDistributorArgs {
    /// Distributor name (e.g., "DIST1").
    #[arg(long)]
    pub name: String,

    /// Name of an existing parent distributor.
    #[arg(long)]
    pub parent: Option<String>,
}

/// Execute `territory add-distributor`.
pub fn run_add_distributor(args: &AddDistributorArgs, workspace: &mut Workspace) -> Result<u8> {
    workspace
        .system
        .add_distributor(&args.name, args.parent.as_deref())?;
    println!("OK: added distributor {}", args.name);

    workspace.persist()?;
    Ok(0)
}
