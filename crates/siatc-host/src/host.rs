//! # View Host
//!
//! Resolves views for a role, builds renderers over data-service records,
//! and executes the events they emit.
//!
//! ## Event Execution
//!
//! | Action type | Host behavior |
//! |-------------|---------------|
//! | `delete` | deletes the item through the data service |
//! | `create` | returns [`Intent::Create`] naming the form to open |
//! | `update` | returns [`Intent::Edit`] with the item id |
//! | `navigate` | returns [`Intent::Navigate`] |
//! | `custom` | returns [`Intent::Custom`] |
//!
//! Saves go through [`ViewHost::save`]: values are normalized, validated
//! against the entity's record schema, then created or updated. The form's
//! submitting state is cleared whether the save succeeds or not.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Number, Value};
use siatc_core::{
    ActionDef, ActionType, EntityDefinition, FieldType, Record, Role, ViewDefinition, ViewType,
};
use siatc_registry::{Registry, RegistryError};
use siatc_schema::{RecordSchema, RecordValidationError};
use siatc_views::{DeckView, FormView, TableView, ViewError, ViewEvent};
use thiserror::Error;

use crate::config::HostConfig;
use crate::data::{record_id, DataError, DataService};
use crate::memory::MemoryDataService;

/// Host operation failure.
#[derive(Error, Debug)]
pub enum HostError {
    /// A view, entity, or record does not exist.
    #[error("{what} not found")]
    NotFound { what: String },

    /// The role may not see the view or trigger the action.
    #[error("role '{role}' may not access '{target}'")]
    Forbidden { role: String, target: String },

    /// The data service failed.
    #[error(transparent)]
    Data(#[from] DataError),

    /// Submitted values failed record validation.
    #[error(transparent)]
    Invalid(#[from] RecordValidationError),

    /// A renderer could not be built for the view.
    #[error(transparent)]
    View(#[from] ViewError),

    /// An action that needs a record was triggered without one.
    #[error("action '{action}' requires an item with an id")]
    MissingItem { action: String },

    /// The catalog could not be loaded or is inconsistent.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// A renderer ready for display.
#[derive(Debug, Clone)]
pub enum OpenView {
    Table(TableView),
    Deck(DeckView),
    Form(FormView),
}

impl OpenView {
    pub fn view(&self) -> &ViewDefinition {
        match self {
            Self::Table(t) => t.view(),
            Self::Deck(d) => d.view(),
            Self::Form(f) => f.view(),
        }
    }
}

/// Views of one entity in a role's menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuGroup {
    pub entity: String,
    pub label: String,
    pub views: Vec<ViewDefinition>,
}

/// What the caller should do after an event was dispatched.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// The item was deleted; reload the view.
    Deleted { entity: String, id: String },
    /// Open a form to create a record. `form` is the first form view of the
    /// entity the role can see, if any.
    Create { entity: String, form: Option<String> },
    /// Open a form to edit the record with `id`.
    Edit {
        entity: String,
        id: String,
        form: Option<String>,
    },
    Navigate { action: ActionDef, item: Option<Record> },
    Custom { action: ActionDef, item: Option<Record> },
}

/// Role-aware façade over a registry and a data service.
#[derive(Debug, Clone)]
pub struct ViewHost<D> {
    registry: Arc<Registry>,
    data: D,
}

impl ViewHost<MemoryDataService> {
    /// Load the catalog and optional seed data named by `config`.
    ///
    /// # Errors
    ///
    /// Returns `HostError::Registry` if the catalog cannot be loaded or is
    /// inconsistent, and `HostError::Data` if the seed data cannot be read.
    pub async fn from_config(config: &HostConfig) -> Result<Self, HostError> {
        let registry = Registry::load(&config.catalog_dir)?;
        registry.ensure_consistent()?;
        let data = match &config.data_dir {
            Some(dir) => MemoryDataService::load_dir(dir).await?,
            None => MemoryDataService::new(),
        };
        Ok(Self::new(Arc::new(registry), data))
    }
}

impl<D: DataService> ViewHost<D> {
    pub fn new(registry: Arc<Registry>, data: D) -> Self {
        Self { registry, data }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    /// Views `role` may see, grouped by entity. Groups are ordered by entity
    /// label, views within a group by name.
    pub fn menu(&self, role: &Role) -> Vec<MenuGroup> {
        let mut groups: HashMap<String, MenuGroup> = HashMap::new();
        for view in self.registry.get_views_for_role(role) {
            let group = groups.entry(view.entity.clone()).or_insert_with(|| {
                let label = self
                    .registry
                    .get_entity(&view.entity)
                    .map(|e| e.label)
                    .unwrap_or_else(|| view.entity.clone());
                MenuGroup {
                    entity: view.entity.clone(),
                    label,
                    views: Vec::new(),
                }
            });
            group.views.push(view.scoped_to(role));
        }
        let mut menu: Vec<MenuGroup> = groups.into_values().collect();
        menu.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.entity.cmp(&b.entity)));
        for group in &mut menu {
            group.views.sort_by(|a, b| a.name.cmp(&b.name));
        }
        menu
    }

    /// The view `view_id` scoped to `role`, with its entity.
    fn resolve(
        &self,
        role: &Role,
        view_id: &str,
    ) -> Result<(ViewDefinition, EntityDefinition), HostError> {
        let view = self
            .registry
            .get_view(view_id)
            .ok_or_else(|| HostError::NotFound {
                what: format!("view '{view_id}'"),
            })?;
        if !view.permits(role) {
            tracing::warn!(role = %role, view = view_id, "view access denied");
            return Err(HostError::Forbidden {
                role: role.to_string(),
                target: view_id.to_string(),
            });
        }
        let entity = self
            .registry
            .get_entity(&view.entity)
            .ok_or_else(|| HostError::NotFound {
                what: format!("entity '{}'", view.entity),
            })?;
        Ok((view.scoped_to(role), entity))
    }

    /// Open a view for `role`. Form views open empty, for creation.
    pub async fn open(&self, role: &Role, view_id: &str) -> Result<OpenView, HostError> {
        let (view, entity) = self.resolve(role, view_id)?;
        let opened = match view.view_type() {
            ViewType::Table => {
                let data = self.data.list(&entity).await?;
                OpenView::Table(TableView::new(view, entity, data)?)
            }
            ViewType::Deck => {
                let data = self.data.list(&entity).await?;
                OpenView::Deck(DeckView::new(view, entity, data)?)
            }
            ViewType::Form => OpenView::Form(FormView::new(view, entity, None)?),
        };
        tracing::info!(role = %role, view = view_id, "view opened");
        Ok(opened)
    }

    /// Open form view `view_id` to create a record, or to edit `record_id`.
    pub async fn open_form(
        &self,
        role: &Role,
        view_id: &str,
        record_id: Option<&str>,
    ) -> Result<FormView, HostError> {
        let (view, entity) = self.resolve(role, view_id)?;
        let record = match record_id {
            None => None,
            Some(id) => Some(self.data.get(&entity, id).await?.ok_or_else(|| {
                HostError::NotFound {
                    what: format!("'{}' record '{id}'", entity.name),
                }
            })?),
        };
        Ok(FormView::new(view, entity, record)?)
    }

    /// First form view of `entity` visible to `role`.
    fn form_for(&self, role: &Role, entity: &str) -> Option<String> {
        self.registry
            .get_views_for_role(role)
            .into_iter()
            .find(|v| v.entity == entity && v.view_type() == ViewType::Form)
            .map(|v| v.id)
    }

    /// Execute an event emitted by view `view_id`.
    ///
    /// # Errors
    ///
    /// Returns `HostError::Forbidden` unless the event carries, unchanged, an
    /// action the role may trigger on the view (or a deck's default
    /// navigate action). The declared action decides what is executed.
    pub async fn dispatch(
        &self,
        role: &Role,
        view_id: &str,
        event: &ViewEvent,
    ) -> Result<Intent, HostError> {
        let (view, entity) = self.resolve(role, view_id)?;
        let claimed = event.action();
        // `resolve` already dropped the actions this role may not trigger.
        let declared = match view.action(&claimed.id) {
            Some(action) => Some(action.clone()),
            None if view.view_type() == ViewType::Deck => {
                Some(DeckView::default_navigate()).filter(|d| d.id == claimed.id)
            }
            None => None,
        };
        // The event must carry the declared action unchanged.
        let action = match declared {
            Some(action) if action == *claimed => action,
            _ => {
                tracing::warn!(role = %role, view = view_id, action = %claimed.id, "action denied");
                return Err(HostError::Forbidden {
                    role: role.to_string(),
                    target: format!("{view_id}/{}", claimed.id),
                });
            }
        };
        let item_id = || {
            event
                .item()
                .and_then(|item| record_id(&entity, item))
                .ok_or_else(|| HostError::MissingItem {
                    action: action.id.clone(),
                })
        };

        let intent = match action.action_type {
            ActionType::Delete => {
                let id = item_id()?;
                self.data.delete(&entity, &id).await?;
                tracing::info!(role = %role, entity = %entity.name, id = %id, "record deleted");
                Intent::Deleted {
                    entity: entity.name.clone(),
                    id,
                }
            }
            ActionType::Create => Intent::Create {
                form: self.form_for(role, &entity.name),
                entity: entity.name.clone(),
            },
            ActionType::Update => Intent::Edit {
                id: item_id()?,
                form: self.form_for(role, &entity.name),
                entity: entity.name.clone(),
            },
            ActionType::Navigate => Intent::Navigate {
                action: action.clone(),
                item: event.item().cloned(),
            },
            ActionType::Custom => Intent::Custom {
                action: action.clone(),
                item: event.item().cloned(),
            },
        };
        Ok(intent)
    }

    /// Persist the values a form submitted, then clear its submitting state.
    pub async fn save(
        &self,
        role: &Role,
        form: &mut FormView,
        values: Record,
    ) -> Result<Record, HostError> {
        let result = self.persist(role, form, values).await;
        form.finish_submit();
        match &result {
            Ok(_) => tracing::info!(role = %role, view = %form.view().id, "form saved"),
            Err(e) => tracing::warn!(role = %role, view = %form.view().id, error = %e, "form save failed"),
        }
        result
    }

    async fn persist(
        &self,
        role: &Role,
        form: &FormView,
        values: Record,
    ) -> Result<Record, HostError> {
        let (_, entity) = self.resolve(role, &form.view().id)?;
        let values = normalize_values(&entity, values);
        RecordSchema::for_entity(&entity)?.validate(&values)?;

        let existing_id = form.record().and_then(|r| record_id(&entity, r));
        let stored = match existing_id {
            Some(id) => self.data.update(&entity, &id, values).await?,
            None => self.data.create(&entity, values).await?,
        };
        Ok(stored)
    }
}

/// Convert raw control values into typed record values.
///
/// - An empty string on a non-textual field becomes `null`.
/// - A numeric string on a `number` field becomes a number.
/// - `"true"` / `"false"` on a `boolean` field become booleans.
///
/// Keys without a field definition pass through unchanged.
pub fn normalize_values(entity: &EntityDefinition, values: Record) -> Record {
    values
        .into_iter()
        .map(|(key, value)| {
            let normalized = match entity.field(&key) {
                Some(field) => normalize_value(field.field_type, value),
                None => value,
            };
            (key, normalized)
        })
        .collect()
}

fn normalize_value(field_type: FieldType, value: Value) -> Value {
    let s = match value {
        Value::String(s) => s,
        other => return other,
    };
    if s.is_empty() && !field_type.is_textual() {
        return Value::Null;
    }
    match field_type {
        FieldType::Number => parse_number(s.trim()).unwrap_or(Value::String(s)),
        FieldType::Boolean => match s.as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(s),
        },
        FieldType::Text
        | FieldType::Textarea
        | FieldType::Date
        | FieldType::Datetime
        | FieldType::Enum
        | FieldType::Image
        | FieldType::Ref
        | FieldType::Email
        | FieldType::Phone
        | FieldType::Latlong => Value::String(s),
    }
}

fn parse_number(s: &str) -> Option<Value> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Value::Number(i.into()));
    }
    s.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use siatc_core::FieldDef;

    fn entity() -> EntityDefinition {
        EntityDefinition {
            name: "priorities".into(),
            label: "Prioridades".into(),
            id_field: "id".into(),
            label_field: "nombre".into(),
            fields: vec![
                FieldDef::new("id", "ID", FieldType::Number).read_only(),
                FieldDef::new("nombre", "Nombre", FieldType::Text),
                FieldDef::new("nivel", "Nivel", FieldType::Number),
                FieldDef::new("activa", "Activa", FieldType::Boolean),
                FieldDef::new("desde", "Desde", FieldType::Date),
            ],
        }
    }

    fn rec(v: Value) -> Record {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_normalize_values() {
        let out = normalize_values(
            &entity(),
            rec(json!({
                "nombre": "",
                "nivel": "3",
                "activa": "true",
                "desde": "",
                "extra": ""
            })),
        );
        assert_eq!(
            out,
            rec(json!({
                "nombre": "",
                "nivel": 3,
                "activa": true,
                "desde": null,
                "extra": ""
            }))
        );
    }

    #[test]
    fn test_normalize_keeps_unparseable_numbers() {
        let out = normalize_values(&entity(), rec(json!({"nivel": "alto", "activa": false})));
        assert_eq!(out["nivel"], "alto");
        assert_eq!(out["activa"], false);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("2.5"), Some(json!(2.5)));
        assert_eq!(parse_number("-7"), Some(json!(-7)));
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("x"), None);
    }
}
