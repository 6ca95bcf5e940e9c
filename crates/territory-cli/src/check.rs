//! # Check Subcommand
//!
//! Decides whether a distributor may operate in a region and prints the
//! region's names alongside the result. Never writes state.

use anyhow::Result;
use clap::Args;

use territory_core::{DistributionSystem, Verdict};

use crate::Workspace;

/// Arguments for `territory check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Distributor name.
    #[arg(long)]
    pub name: String,

    /// Region code to check.
    #[arg(long)]
    pub region: String,
}

/// Execute `territory check`.
pub fn run_check(args: &CheckArgs, workspace: &Workspace) -> Result<u8> {
    let verdict = workspace
        .system
        .explain_permission(&args.name, &args.region)?;
    print!("{}", render_check(&workspace.system, args, &verdict));
    Ok(0)
}

/// Format a check result.
pub fn render_check(system: &DistributionSystem, args: &CheckArgs, verdict: &Verdict) -> String {
    let mut out = format!("Permission check for {}:\n", args.name);
    match system.location(&args.region) {
        Some(location) => {
            out.push_str(&format!("Region: {} ({})\n", args.region, location.describe()))
        }
        None => out.push_str(&format!("Region: {}\n", args.region)),
    }
    out.push_str(&format!("Result: {}\n", verdict.is_granted()));
    if !verdict.is_granted() {
        out.push_str(&format!("Reason: {verdict}\n"));
    }
    out
}
