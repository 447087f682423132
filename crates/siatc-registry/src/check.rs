//! # Consistency Check
//!
//! Verifies the invariants that span definitions and therefore cannot be
//! enforced when a single definition is parsed:
//!
//! - entity: unique field keys; `idField`/`labelField` exist; `options`
//!   present iff `enum`; `refEntity` present iff `ref`, naming a registered
//!   entity.
//! - view: `entity` is registered; every field referenced by the config
//!   exists on it; action ids unique; non-empty role set; table page size
//!   at least 1.
//!
//! Violations are collected, never short-circuited.

use std::collections::HashMap;

use siatc_core::{EntityDefinition, FieldType, ViewConfig, ViewDefinition};
use thiserror::Error;

/// One broken invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyViolation {
    #[error("entity '{entity}': field key '{key}' is declared more than once")]
    DuplicateFieldKey { entity: String, key: String },

    #[error("entity '{entity}': idField '{field}' is not a declared field")]
    MissingIdField { entity: String, field: String },

    #[error("entity '{entity}': labelField '{field}' is not a declared field")]
    MissingLabelField { entity: String, field: String },

    #[error("entity '{entity}': enum field '{field}' declares no options")]
    EnumWithoutOptions { entity: String, field: String },

    #[error("entity '{entity}': field '{field}' declares options but is not an enum")]
    OptionsOnNonEnum { entity: String, field: String },

    #[error("entity '{entity}': ref field '{field}' declares no refEntity")]
    RefWithoutEntity { entity: String, field: String },

    #[error("entity '{entity}': field '{field}' declares refEntity but is not a ref")]
    RefEntityOnNonRef { entity: String, field: String },

    #[error("entity '{entity}': ref field '{field}' targets unknown entity '{target}'")]
    UnknownRefEntity {
        entity: String,
        field: String,
        target: String,
    },

    #[error("view '{view}': entity '{entity}' is not registered")]
    UnknownEntity { view: String, entity: String },

    #[error("view '{view}': config references field '{field}' missing from entity '{entity}'")]
    UnknownConfigField {
        view: String,
        entity: String,
        field: String,
    },

    #[error("view '{view}': action id '{action}' is declared more than once")]
    DuplicateActionId { view: String, action: String },

    #[error("view '{view}': role set is empty")]
    EmptyRoles { view: String },

    #[error("view '{view}': table pageSize must be at least 1")]
    ZeroPageSize { view: String },
}

/// Check entity and view definitions together.
pub fn check_definitions(
    entities: &[EntityDefinition],
    views: &[ViewDefinition],
) -> Vec<ConsistencyViolation> {
    let by_name: HashMap<&str, &EntityDefinition> =
        entities.iter().map(|e| (e.name.as_str(), e)).collect();

    let mut violations = Vec::new();
    for entity in entities {
        check_entity(entity, &by_name, &mut violations);
    }
    for view in views {
        check_view(view, &by_name, &mut violations);
    }
    violations
}

fn check_entity(
    entity: &EntityDefinition,
    by_name: &HashMap<&str, &EntityDefinition>,
    out: &mut Vec<ConsistencyViolation>,
) {
    let name = || entity.name.clone();

    for key in entity.duplicate_keys() {
        out.push(ConsistencyViolation::DuplicateFieldKey {
            entity: name(),
            key: key.to_string(),
        });
    }
    if !entity.has_field(&entity.id_field) {
        out.push(ConsistencyViolation::MissingIdField {
            entity: name(),
            field: entity.id_field.clone(),
        });
    }
    if !entity.has_field(&entity.label_field) {
        out.push(ConsistencyViolation::MissingLabelField {
            entity: name(),
            field: entity.label_field.clone(),
        });
    }

    for field in &entity.fields {
        let field_name = || field.key.clone();
        let is_enum = field.field_type == FieldType::Enum;
        let has_options = field.options.as_ref().is_some_and(|o| !o.is_empty());
        if is_enum && !has_options {
            out.push(ConsistencyViolation::EnumWithoutOptions {
                entity: name(),
                field: field_name(),
            });
        }
        if !is_enum && field.options.is_some() {
            out.push(ConsistencyViolation::OptionsOnNonEnum {
                entity: name(),
                field: field_name(),
            });
        }

        match (field.field_type, &field.ref_entity) {
            (FieldType::Ref, None) => out.push(ConsistencyViolation::RefWithoutEntity {
                entity: name(),
                field: field_name(),
            }),
            (FieldType::Ref, Some(target)) if !by_name.contains_key(target.as_str()) => {
                out.push(ConsistencyViolation::UnknownRefEntity {
                    entity: name(),
                    field: field_name(),
                    target: target.clone(),
                })
            }
            (FieldType::Ref, Some(_)) => {}
            (_, Some(_)) => out.push(ConsistencyViolation::RefEntityOnNonRef {
                entity: name(),
                field: field_name(),
            }),
            (_, None) => {}
        }
    }
}

fn check_view(
    view: &ViewDefinition,
    by_name: &HashMap<&str, &EntityDefinition>,
    out: &mut Vec<ConsistencyViolation>,
) {
    match by_name.get(view.entity.as_str()) {
        None => out.push(ConsistencyViolation::UnknownEntity {
            view: view.id.clone(),
            entity: view.entity.clone(),
        }),
        Some(entity) => {
            for field in view.config.referenced_fields() {
                if !entity.has_field(field) {
                    out.push(ConsistencyViolation::UnknownConfigField {
                        view: view.id.clone(),
                        entity: entity.name.clone(),
                        field: field.to_string(),
                    });
                }
            }
        }
    }

    for action in view.duplicate_action_ids() {
        out.push(ConsistencyViolation::DuplicateActionId {
            view: view.id.clone(),
            action: action.to_string(),
        });
    }
    if view.roles.is_empty() {
        out.push(ConsistencyViolation::EmptyRoles {
            view: view.id.clone(),
        });
    }
    if let ViewConfig::Table(table) = &view.config {
        if table.page_size == 0 {
            out.push(ConsistencyViolation::ZeroPageSize {
                view: view.id.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tickets() -> EntityDefinition {
        serde_json::from_value(json!({
            "name": "tickets",
            "label": "Tickets",
            "idField": "id",
            "labelField": "asunto",
            "fields": [
                { "key": "id", "label": "ID", "type": "number" },
                { "key": "asunto", "label": "Asunto", "type": "text" },
                { "key": "estado", "label": "Estado", "type": "enum", "options": ["ABIERTO", "CERRADO"] },
                { "key": "cliente", "label": "Cliente", "type": "ref", "refEntity": "users" }
            ]
        }))
        .unwrap()
    }

    fn users() -> EntityDefinition {
        serde_json::from_value(json!({
            "name": "users",
            "label": "Usuarios",
            "idField": "id",
            "labelField": "nombre",
            "fields": [
                { "key": "id", "label": "ID", "type": "number" },
                { "key": "nombre", "label": "Nombre", "type": "text" }
            ]
        }))
        .unwrap()
    }

    fn deck(title: &str) -> ViewDefinition {
        serde_json::from_value(json!({
            "id": "tickets-deck",
            "entity": "tickets",
            "type": "deck",
            "name": "Tickets",
            "config": { "titleField": title, "subtitleField": "estado", "statusField": "estado" },
            "roles": ["ALL"]
        }))
        .unwrap()
    }

    #[test]
    fn test_consistent_definitions() {
        let v = check_definitions(&[tickets(), users()], &[deck("asunto")]);
        assert!(v.is_empty(), "{v:?}");
    }

    #[test]
    fn test_unknown_config_field() {
        let v = check_definitions(&[tickets(), users()], &[deck("titulo")]);
        assert_eq!(
            v,
            vec![ConsistencyViolation::UnknownConfigField {
                view: "tickets-deck".into(),
                entity: "tickets".into(),
                field: "titulo".into(),
            }]
        );
    }

    #[test]
    fn test_unknown_ref_target() {
        let v = check_definitions(&[tickets()], &[]);
        assert_eq!(
            v,
            vec![ConsistencyViolation::UnknownRefEntity {
                entity: "tickets".into(),
                field: "cliente".into(),
                target: "users".into(),
            }]
        );
    }

    #[test]
    fn test_field_pairing_rules() {
        let mut e = users();
        e.fields[1].options = Some(vec!["a".into()]);
        e.fields[1].ref_entity = Some("users".into());
        e.fields.push(serde_json::from_value(json!({"key":"rol","label":"Rol","type":"enum"})).unwrap());
        e.fields.push(serde_json::from_value(json!({"key":"jefe","label":"Jefe","type":"ref"})).unwrap());
        let v = check_definitions(&[e], &[]);
        assert!(v.contains(&ConsistencyViolation::OptionsOnNonEnum {
            entity: "users".into(),
            field: "nombre".into()
        }));
        assert!(v.contains(&ConsistencyViolation::RefEntityOnNonRef {
            entity: "users".into(),
            field: "nombre".into()
        }));
        assert!(v.contains(&ConsistencyViolation::EnumWithoutOptions {
            entity: "users".into(),
            field: "rol".into()
        }));
        assert!(v.contains(&ConsistencyViolation::RefWithoutEntity {
            entity: "users".into(),
            field: "jefe".into()
        }));
        assert_eq!(v.len(), 4);
    }

    #[test]
    fn test_missing_id_and_label_fields() {
        let mut e = users();
        e.id_field = "codigo".into();
        e.label_field = "alias".into();
        let v = check_definitions(&[e], &[]);
        assert_eq!(v.len(), 2);
        assert!(matches!(v[0], ConsistencyViolation::MissingIdField { .. }));
        assert!(matches!(v[1], ConsistencyViolation::MissingLabelField { .. }));
    }

    #[test]
    fn test_duplicate_action_and_zero_page_size() {
        let view: ViewDefinition = serde_json::from_value(json!({
            "id": "users-table",
            "entity": "users",
            "type": "table",
            "name": "Usuarios",
            "config": { "columns": ["nombre"], "pageSize": 0 },
            "actions": [
                { "id": "edit", "label": "Edit", "type": "update" },
                { "id": "edit", "label": "Edit again", "type": "update" }
            ],
            "roles": ["ADMIN"]
        }))
        .unwrap();
        let v = check_definitions(&[users()], &[view]);
        assert_eq!(v.len(), 2);
        assert!(v.iter().any(|x| x.to_string().contains("action id 'edit'")));
        assert!(v.iter().any(|x| x.to_string().contains("pageSize")));
    }
}
