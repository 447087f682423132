//! # siatc CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use siatc_cli::check::{run_check, CheckArgs};
use siatc_cli::show::{run_show, ShowArgs};
use siatc_cli::views::{run_views, ViewsArgs};
use siatc_host::HostConfig;

/// SIATC catalog tool
///
/// Checks catalog consistency, lists the views a role may see, and renders
/// table and deck views over seed data.
#[derive(Parser, Debug)]
#[command(name = "siatc", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load the catalog and report consistency violations.
    Check(CheckArgs),

    /// List the views visible to a role.
    Views(ViewsArgs),

    /// Render a table or deck view as text.
    Show(ShowArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = HostConfig::from_env();
    tracing::debug!(?config, "siatc starting");

    let result = match &cli.command {
        Commands::Check(args) => run_check(args, &config),
        Commands::Views(args) => run_views(args, &config),
        Commands::Show(args) => run_show(args, &config).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
