//! # Check Subcommand
//!
//! Loads every entity and view document under the catalog directory and
//! runs the registry consistency check. All violations are printed, not
//! only the first.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use siatc_host::HostConfig;
use siatc_registry::Registry;

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Catalog directory. Defaults to `SIATC_CATALOG_DIR`, then `catalog`.
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs, config: &HostConfig) -> Result<u8> {
    let dir = crate::catalog_dir(args.catalog.as_ref(), config);
    let mut out = std::io::stdout().lock();
    check_catalog(&dir, &mut out)
}

/// Check the catalog at `dir`, writing the report to `out`.
pub fn check_catalog(dir: &Path, out: &mut impl Write) -> Result<u8> {
    let registry = Registry::load(dir)
        .with_context(|| format!("failed to load catalog from {}", dir.display()))?;
    tracing::info!(
        entities = registry.entity_count(),
        views = registry.view_count(),
        "catalog loaded"
    );

    let violations = registry.check();
    if violations.is_empty() {
        writeln!(
            out,
            "OK: {} entities, {} views",
            registry.entity_count(),
            registry.view_count()
        )?;
        return Ok(0);
    }

    for violation in &violations {
        writeln!(out, "  - {violation}")?;
    }
    writeln!(out, "FAIL: {} violation(s)", violations.len())?;
    Ok(1)
}
