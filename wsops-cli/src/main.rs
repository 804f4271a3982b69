//! wsops: workspace git sync and linked-service config CLI.
//!
//! # Usage
//!
//! ```text
//! wsops update --workspace-id <id> <credentials> [--conflict-policy prefer-remote|prefer-workspace] [--strict]
//! wsops commit --workspace-id <id> <credentials> [--message <text>]
//! wsops status --workspace-id <id> <credentials> [--json]
//! wsops config --lakehouse-workspace-id <id> --warehouse-workspace-id <id> <credentials> [--output <file>]
//!
//! <credentials> = --tenant-id --client-id [--client-secret] --user-name --password
//! ```
//!
//! Every credential and workspace flag can also come from a `WSOPS_*`
//! environment variable.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{commit::CommitArgs, config::ConfigArgs, status::StatusArgs, update::UpdateArgs};
use wsops_core::settings;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "wsops",
    version,
    about = "Sync workspaces with their git branch and generate linked-service config",
    long_about = None,
)]
struct Cli {
    /// Settings file (default: ~/.wsops/settings.yaml if present).
    #[arg(long, global = true, env = "WSOPS_SETTINGS")]
    settings: Option<PathBuf>,

    /// Log level when RUST_LOG is unset (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pull the connected branch into the workspace.
    Update(UpdateArgs),

    /// Commit every changed workspace item to the connected branch.
    Commit(CommitArgs),

    /// Show the workspace's git sync status.
    Status(StatusArgs),

    /// Generate the linked-service config file from lakehouses and warehouses.
    Config(ConfigArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let settings = settings::load(cli.settings.as_deref()).context("failed to load settings")?;
    match cli.command {
        Commands::Update(args) => args.run(&settings),
        Commands::Commit(args) => args.run(&settings),
        Commands::Status(args) => args.run(&settings),
        Commands::Config(args) => args.run(&settings),
    }
}

/// Install the global subscriber once. `RUST_LOG` wins over `--log-level`.
fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
