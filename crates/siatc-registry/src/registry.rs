//! # Registry Store
//!
//! Definitions live in insertion-ordered vectors with a key → slot index.
//! Replacing a definition keeps its slot, so listing order is the order in
//! which keys were first registered.
//!
//! The lock is `parking_lot::RwLock`: never held across `.await`, and a
//! panicking writer does not poison it.

use std::collections::HashMap;
use std::path::Path;

use parking_lot::RwLock;
use siatc_core::{EntityDefinition, Role, ViewDefinition};
use siatc_schema::{Catalog, CatalogError};
use thiserror::Error;

use crate::check::{self, ConsistencyViolation};

/// Errors surfaced while composing a registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The catalog directory could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The registered definitions violate one or more invariants.
    #[error("registry is inconsistent ({} violations):\n{}", violations.len(), render(violations))]
    Inconsistent {
        /// Every violation found.
        violations: Vec<ConsistencyViolation>,
    },
}

fn render(violations: &[ConsistencyViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("  {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Insertion-ordered keyed slots.
#[derive(Debug)]
struct Slots<T> {
    items: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Clone> Slots<T> {
    fn upsert(&mut self, key: String, value: T) -> Option<T> {
        match self.index.get(&key) {
            Some(&slot) => Some(std::mem::replace(&mut self.items[slot], value)),
            None => {
                self.index.insert(key, self.items.len());
                self.items.push(value);
                None
            }
        }
    }

    fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|&slot| &self.items[slot])
    }
}

#[derive(Debug, Default)]
struct Inner {
    views: Slots<ViewDefinition>,
    entities: Slots<EntityDefinition>,
}

/// Process-wide store of view and entity definitions.
#[derive(Debug, Default)]
pub struct Registry {
    inner: RwLock<Inner>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry populated from a loaded catalog.
    pub fn from_catalog(catalog: Catalog) -> Self {
        let registry = Self::new();
        registry.register_catalog(catalog);
        registry
    }

    /// Load a catalog directory and register everything in it.
    ///
    /// This does not run the consistency check; call
    /// [`Registry::ensure_consistent`] once composition is complete.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Catalog` if the directory cannot be loaded.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let catalog = Catalog::load(dir)?;
        Ok(Self::from_catalog(catalog))
    }

    /// Register every entity, then every view, of a catalog.
    pub fn register_catalog(&self, catalog: Catalog) {
        for entity in catalog.entities {
            self.register_entity(entity);
        }
        for view in catalog.views {
            self.register_view(view);
        }
    }

    /// Insert or replace a view keyed by `view.id`.
    ///
    /// Returns the replaced definition, if any.
    pub fn register_view(&self, view: ViewDefinition) -> Option<ViewDefinition> {
        let id = view.id.clone();
        let previous = self.inner.write().views.upsert(id.clone(), view);
        if previous.is_some() {
            tracing::debug!(view = %id, "view definition replaced");
        } else {
            tracing::debug!(view = %id, "view definition registered");
        }
        previous
    }

    /// Insert or replace an entity keyed by `entity.name`.
    ///
    /// Returns the replaced definition, if any.
    pub fn register_entity(&self, entity: EntityDefinition) -> Option<EntityDefinition> {
        let name = entity.name.clone();
        let previous = self.inner.write().entities.upsert(name.clone(), entity);
        if previous.is_some() {
            tracing::debug!(entity = %name, "entity definition replaced");
        } else {
            tracing::debug!(entity = %name, "entity definition registered");
        }
        previous
    }

    /// Exact-key view lookup.
    pub fn get_view(&self, id: &str) -> Option<ViewDefinition> {
        self.inner.read().views.get(id).cloned()
    }

    /// Exact-key entity lookup.
    pub fn get_entity(&self, name: &str) -> Option<EntityDefinition> {
        self.inner.read().entities.get(name).cloned()
    }

    /// Every view `role` may see, in registration order.
    pub fn get_views_for_role(&self, role: &Role) -> Vec<ViewDefinition> {
        self.inner
            .read()
            .views
            .items
            .iter()
            .filter(|v| v.permits(role))
            .cloned()
            .collect()
    }

    /// Every registered view, in registration order.
    pub fn views(&self) -> Vec<ViewDefinition> {
        self.inner.read().views.items.clone()
    }

    /// Every registered entity, in registration order.
    pub fn entities(&self) -> Vec<EntityDefinition> {
        self.inner.read().entities.items.clone()
    }

    pub fn view_count(&self) -> usize {
        self.inner.read().views.items.len()
    }

    pub fn entity_count(&self) -> usize {
        self.inner.read().entities.items.len()
    }

    /// Check every registered definition and report all violations.
    pub fn check(&self) -> Vec<ConsistencyViolation> {
        let inner = self.inner.read();
        check::check_definitions(&inner.entities.items, &inner.views.items)
    }

    /// Like [`Registry::check`], as a `Result`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Inconsistent` carrying every violation.
    pub fn ensure_consistent(&self) -> Result<(), RegistryError> {
        let violations = self.check();
        if violations.is_empty() {
            tracing::info!(
                views = self.view_count(),
                entities = self.entity_count(),
                "registry consistent"
            );
            Ok(())
        } else {
            for v in &violations {
                tracing::warn!(violation = %v, "registry inconsistency");
            }
            Err(RegistryError::Inconsistent { violations })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn view(id: &str, entity: &str, roles: &[&str]) -> ViewDefinition {
        serde_json::from_value(json!({
            "id": id,
            "entity": entity,
            "type": "table",
            "name": id,
            "config": { "columns": ["id"] },
            "roles": roles,
        }))
        .unwrap()
    }

    fn entity(name: &str) -> EntityDefinition {
        serde_json::from_value(json!({
            "name": name,
            "label": name,
            "idField": "id",
            "labelField": "id",
            "fields": [{ "key": "id", "label": "ID", "type": "number" }]
        }))
        .unwrap()
    }

    #[test]
    fn test_get_view_miss_is_none() {
        let reg = Registry::new();
        assert!(reg.get_view("nope").is_none());
        assert!(reg.get_entity("nope").is_none());
    }

    #[test]
    fn test_register_and_lookup() {
        let reg = Registry::new();
        reg.register_entity(entity("tickets"));
        reg.register_view(view("tickets-table", "tickets", &["ADMIN"]));
        assert_eq!(reg.get_view("tickets-table").unwrap().entity, "tickets");
        assert_eq!(reg.get_entity("tickets").unwrap().id_field, "id");
    }

    #[test]
    fn test_reregister_replaces_in_place() {
        let reg = Registry::new();
        reg.register_view(view("a", "tickets", &["ADMIN"]));
        reg.register_view(view("b", "tickets", &["ADMIN"]));
        let mut replacement = view("a", "users", &["ADMIN"]);
        replacement.name = "replaced".into();
        let previous = reg.register_view(replacement).unwrap();
        assert_eq!(previous.entity, "tickets");

        assert_eq!(reg.view_count(), 2);
        let ids: Vec<_> = reg.views().into_iter().map(|v| (v.id, v.name)).collect();
        assert_eq!(
            ids,
            vec![("a".into(), "replaced".into()), ("b".into(), "b".into())]
        );
    }

    #[test]
    fn test_idempotent_reregistration() {
        let reg = Registry::new();
        reg.register_view(view("a", "tickets", &["ADMIN"]));
        reg.register_view(view("a", "tickets", &["ADMIN"]));
        assert_eq!(reg.view_count(), 1);
    }

    #[test]
    fn test_get_views_for_role_exact_and_wildcard() {
        let reg = Registry::new();
        reg.register_view(view("admin-only", "tickets", &["ADMIN"]));
        reg.register_view(view("everyone", "tickets", &["ALL"]));
        reg.register_view(view("tech", "tickets", &["TECNICO", "ADMIN"]));

        let ids = |role: &str| -> Vec<String> {
            reg.get_views_for_role(&Role::new(role))
                .into_iter()
                .map(|v| v.id)
                .collect()
        };
        assert_eq!(ids("ADMIN"), vec!["admin-only", "everyone", "tech"]);
        assert_eq!(ids("TECNICO"), vec!["everyone", "tech"]);
        assert_eq!(ids("USUARIO"), vec!["everyone"]);
    }

    #[test]
    fn test_ensure_consistent_reports_all() {
        let reg = Registry::new();
        reg.register_view(view("a", "missing", &["ADMIN"]));
        reg.register_view(view("b", "missing-too", &[]));
        let err = reg.ensure_consistent().unwrap_err();
        match err {
            RegistryError::Inconsistent { violations } => assert_eq!(violations.len(), 3),
            other => panic!("Expected Inconsistent, got: {other}"),
        }
    }
}
