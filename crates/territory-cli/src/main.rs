//! # territory CLI entry point
//!
//! Parses command-line arguments, loads the catalog and state once, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use territory_cli::check::{run_check, CheckArgs};
use territory_cli::distributor::{run_add_distributor, AddDistributorArgs};
use territory_cli::list::{run_list, ListArgs};
use territory_cli::permission::{run_add_permission, AddPermissionArgs};
use territory_cli::{resolve_config, Workspace};

/// Distributor territory permissions.
///
/// Registers distributors in a parent/child hierarchy, grants or denies
/// regions, and checks whether a distributor may operate in a region.
#[derive(Parser, Debug)]
#[command(name = "territory", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Location catalog CSV (overrides the config file).
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Distributor state JSON (overrides the config file).
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register a distributor under an optional parent.
    AddDistributor(AddDistributorArgs),

    /// Add an include or exclude rule to a distributor.
    AddPermission(AddPermissionArgs),

    /// Check whether a distributor may operate in a region.
    Check(CheckArgs),

    /// List all distributors and their rules.
    List(ListArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<u8> {
    let config = resolve_config(cli.config.as_deref(), cli.catalog, cli.state)?;
    tracing::debug!(
        catalog = %config.catalog.display(),
        state = %config.state.display(),
        "resolved configuration"
    );

    let mut workspace = Workspace::open(&config)?;

    match cli.command {
        Commands::AddDistributor(args) => run_add_distributor(&args, &mut workspace),
        Commands::AddPermission(args) => run_add_permission(&args, &mut workspace),
        Commands::Check(args) => run_check(&args, &workspace),
        Commands::List(args) => run_list(&args, &workspace),
    }
}
