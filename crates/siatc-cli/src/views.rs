//! # Views Subcommand
//!
//! Lists the views a role may see, in registration order, one per line:
//! id, type, entity, and display name separated by tabs.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use siatc_core::Role;
use siatc_host::HostConfig;
use siatc_registry::Registry;

/// Arguments for the views subcommand.
#[derive(Args, Debug)]
pub struct ViewsArgs {
    /// Role to list views for. Defaults to `SIATC_DEFAULT_ROLE`.
    #[arg(long)]
    pub role: Option<String>,

    /// Catalog directory. Defaults to `SIATC_CATALOG_DIR`, then `catalog`.
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

/// Execute the views subcommand.
pub fn run_views(args: &ViewsArgs, config: &HostConfig) -> Result<u8> {
    let role = crate::resolve_role(args.role.as_deref(), config)?;
    let dir = crate::catalog_dir(args.catalog.as_ref(), config);
    let mut out = std::io::stdout().lock();
    list_views(&dir, &role, &mut out)
}

/// Write the views visible to `role` in the catalog at `dir`.
pub fn list_views(dir: &Path, role: &Role, out: &mut impl Write) -> Result<u8> {
    let registry = Registry::load(dir)
        .with_context(|| format!("failed to load catalog from {}", dir.display()))?;

    let views = registry.get_views_for_role(role);
    tracing::debug!(role = %role, count = views.len(), "resolved views");
    if views.is_empty() {
        writeln!(out, "no views for role {role}")?;
        return Ok(0);
    }
    for view in views {
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            view.id,
            view.view_type(),
            view.entity,
            view.name
        )?;
    }
    Ok(0)
}
