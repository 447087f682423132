//! # siatc-cli — SIATC Command-Line Interface
//!
//! Inspects a catalog directory and renders its views as plain text.
//!
//! ## Subcommands
//!
//! - `check`: load the catalog and report every consistency violation
//! - `views`: list the views a role may see
//! - `show`: render a table or deck view over seed data
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs` and the `XxxArgs` structs; handlers
//!   delegate to the library crates.
//! - Handlers return the process exit code: `0` on success, `1` when the
//!   catalog is inconsistent.
//! - Paths and the role fall back to `SIATC_*` environment variables when a
//!   flag is omitted.

pub mod check;
pub mod show;
pub mod views;

use std::path::PathBuf;

use anyhow::{bail, Result};
use siatc_core::Role;
use siatc_host::HostConfig;

/// Catalog directory from the flag, else from the environment.
pub(crate) fn catalog_dir(flag: Option<&PathBuf>, config: &HostConfig) -> PathBuf {
    flag.cloned().unwrap_or_else(|| config.catalog_dir.clone())
}

/// Role from the flag, else `SIATC_DEFAULT_ROLE`.
pub(crate) fn resolve_role(flag: Option<&str>, config: &HostConfig) -> Result<Role> {
    match (flag, &config.default_role) {
        (Some(role), _) if !role.trim().is_empty() => Ok(Role::new(role.trim())),
        (_, Some(role)) => Ok(role.clone()),
        _ => bail!("no role given: pass --role or set {}", siatc_host::config::ENV_DEFAULT_ROLE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_role_wins_over_environment() {
        let config = HostConfig {
            default_role: Some(Role::new("USUARIO")),
            ..HostConfig::default()
        };
        assert_eq!(resolve_role(Some("ADMIN"), &config).unwrap(), Role::new("ADMIN"));
        assert_eq!(resolve_role(None, &config).unwrap(), Role::new("USUARIO"));
        assert_eq!(resolve_role(Some("  "), &config).unwrap(), Role::new("USUARIO"));
    }

    #[test]
    fn test_missing_role_is_an_error() {
        let err = resolve_role(None, &HostConfig::default()).unwrap_err();
        assert!(err.to_string().contains("--role"));
    }

    #[test]
    fn test_catalog_flag_overrides_config() {
        let config = HostConfig::default();
        assert_eq!(catalog_dir(None, &config), PathBuf::from("catalog"));
        let flag = PathBuf::from("/tmp/other");
        assert_eq!(catalog_dir(Some(&flag), &config), flag);
    }
}
