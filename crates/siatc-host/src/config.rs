//! # Host Configuration
//!
//! Read from environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `SIATC_CATALOG_DIR` | `catalog` | catalog directory |
//! | `SIATC_DATA_DIR` | unset | seed data directory for the in-memory store |
//! | `SIATC_DEFAULT_ROLE` | unset | role used when a command names none |

use std::path::PathBuf;

use siatc_core::Role;

pub const ENV_CATALOG_DIR: &str = "SIATC_CATALOG_DIR";
pub const ENV_DATA_DIR: &str = "SIATC_DATA_DIR";
pub const ENV_DEFAULT_ROLE: &str = "SIATC_DEFAULT_ROLE";

/// Catalog directory used when none is configured.
pub const DEFAULT_CATALOG_DIR: &str = "catalog";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub catalog_dir: PathBuf,
    pub data_dir: Option<PathBuf>,
    pub default_role: Option<Role>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            catalog_dir: PathBuf::from(DEFAULT_CATALOG_DIR),
            data_dir: None,
            default_role: None,
        }
    }
}

impl HostConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source. Empty
    /// values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            catalog_dir: var(ENV_CATALOG_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_DIR)),
            data_dir: var(ENV_DATA_DIR).map(PathBuf::from),
            default_role: var(ENV_DEFAULT_ROLE).map(Role::new),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = HostConfig::from_lookup(lookup(&[]));
        assert_eq!(config, HostConfig::default());
        assert_eq!(config.catalog_dir, PathBuf::from("catalog"));
    }

    #[test]
    fn test_all_variables() {
        let config = HostConfig::from_lookup(lookup(&[
            (ENV_CATALOG_DIR, "/srv/siatc/catalog"),
            (ENV_DATA_DIR, "/srv/siatc/data"),
            (ENV_DEFAULT_ROLE, "TECNICO"),
        ]));
        assert_eq!(config.catalog_dir, PathBuf::from("/srv/siatc/catalog"));
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/siatc/data")));
        assert_eq!(config.default_role, Some(Role::new("TECNICO")));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = HostConfig::from_lookup(lookup(&[(ENV_CATALOG_DIR, " "), (ENV_DEFAULT_ROLE, "")]));
        assert_eq!(config, HostConfig::default());
    }
}
