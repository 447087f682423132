//! Integration test: the catalog shipped with the repository loads and is
//! internally consistent.

use siatc_core::{Role, ViewType};
use siatc_registry::Registry;
use std::path::PathBuf;

/// Find the repository root.
fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // crates/
    dir.pop(); // repo root
    dir
}

fn registry() -> Registry {
    Registry::load(repo_root().join("catalog")).expect("catalog should load")
}

#[test]
fn test_repo_catalog_is_consistent() {
    let reg = registry();
    assert!(reg.entity_count() >= 4);
    assert!(reg.view_count() >= 9);
    if let Err(e) = reg.ensure_consistent() {
        panic!("{e}");
    }
}

#[test]
fn test_every_role_sees_a_ticket_view() {
    let reg = registry();
    for role in ["ADMIN", "TECNICO", "USUARIO"] {
        let views = reg.get_views_for_role(&Role::new(role));
        assert!(
            views
                .iter()
                .any(|v| v.entity == "tickets" && v.view_type() != ViewType::Form),
            "role {role} has no ticket list view"
        );
    }
}

#[test]
fn test_unknown_role_sees_only_wildcard_views() {
    let reg = registry();
    let views = reg.get_views_for_role(&Role::new("INVITADO"));
    assert!(!views.is_empty());
    assert!(views.iter().all(|v| v.roles.iter().any(Role::is_wildcard)));
}

#[test]
fn test_deck_views_reference_entity_fields() {
    let reg = registry();
    for view in reg.views() {
        let entity = reg.get_entity(&view.entity).unwrap();
        for field in view.config.referenced_fields() {
            assert!(
                entity.has_field(field),
                "view {} references missing field {field}",
                view.id
            );
        }
    }
}
