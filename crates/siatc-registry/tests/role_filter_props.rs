//! Property test: role-based view retrieval returns exactly the views whose
//! role set contains the role or the wildcard, whatever the registration
//! order.

use proptest::prelude::*;
use serde_json::json;
use siatc_core::{Role, ViewDefinition};
use siatc_registry::Registry;

const ROLES: &[&str] = &["ADMIN", "TECNICO", "USUARIO", "ALL"];

fn view(id: usize, roles: &[&str]) -> ViewDefinition {
    serde_json::from_value(json!({
        "id": format!("v{id}"),
        "entity": "tickets",
        "type": "table",
        "name": format!("View {id}"),
        "config": { "columns": ["id"] },
        "roles": roles,
    }))
    .unwrap()
}

fn role_sets() -> impl Strategy<Value = Vec<Vec<&'static str>>> {
    prop::collection::vec(prop::sample::subsequence(ROLES, 0..=ROLES.len()), 0..16)
}

proptest! {
    #[test]
    fn get_views_for_role_is_exact(sets in role_sets(), probe in prop::sample::select(vec!["ADMIN", "TECNICO", "USUARIO", "OTRO"])) {
        let reg = Registry::new();
        for (i, roles) in sets.iter().enumerate() {
            reg.register_view(view(i, roles));
        }

        let got: Vec<String> = reg
            .get_views_for_role(&Role::new(probe))
            .into_iter()
            .map(|v| v.id)
            .collect();
        let expected: Vec<String> = sets
            .iter()
            .enumerate()
            .filter(|(_, roles)| roles.contains(&probe) || roles.contains(&"ALL"))
            .map(|(i, _)| format!("v{i}"))
            .collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn registration_order_does_not_change_the_set(sets in role_sets()) {
        let forward = Registry::new();
        let backward = Registry::new();
        for (i, roles) in sets.iter().enumerate() {
            forward.register_view(view(i, roles));
        }
        for (i, roles) in sets.iter().enumerate().rev() {
            backward.register_view(view(i, roles));
        }
        let role = Role::new("TECNICO");
        let mut a: Vec<String> = forward.get_views_for_role(&role).into_iter().map(|v| v.id).collect();
        let mut b: Vec<String> = backward.get_views_for_role(&role).into_iter().map(|v| v.id).collect();
        a.sort();
        b.sort();
        prop_assert_eq!(a, b);
    }
}
