//! # View Definitions
//!
//! A view is a role-scoped presentation of an entity. Its `type` selects one
//! of three generic renderers and fixes the shape of its `config` payload:
//!
//! | `type` | Config | Payload keys |
//! |--------|--------|--------------|
//! | `table` | [`TableConfig`] | `columns`, `pageSize` |
//! | `deck` | [`DeckConfig`] | `titleField`, `subtitleField`, `statusField`, `imageField` |
//! | `form` | [`FormConfig`] | `layout` |
//!
//! ## Parsing
//!
//! On the wire a view is `{id, entity, type, name, icon?, config, actions,
//! roles}`. Deserialization goes through a raw mirror struct and parses
//! `config` according to `type`, so a `ViewDefinition` value always carries
//! a config matching its type. Field references inside the config are
//! checked against the entity by the registry, which is the only place both
//! definitions are known.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::{ActionDef, ActionType};
use crate::error::ModelError;
use crate::role::Role;

/// Page size used when a table config omits `pageSize`.
pub const DEFAULT_PAGE_SIZE: usize = 10;

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// Renderer selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    Table,
    Deck,
    Form,
}

impl ViewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Deck => "deck",
            Self::Form => "form",
        }
    }
}

impl std::fmt::Display for ViewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ViewType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" => Ok(Self::Table),
            "deck" => Ok(Self::Deck),
            "form" => Ok(Self::Form),
            other => Err(ModelError::UnknownViewType(other.to_string())),
        }
    }
}

/// Table view configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    /// Ordered column keys.
    pub columns: Vec<String>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

/// Deck (card list) view configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckConfig {
    pub title_field: String,
    pub subtitle_field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_field: Option<String>,
}

/// Form layout mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormLayout {
    /// One control per row.
    #[default]
    Single,
    /// Two controls per row.
    Double,
}

/// Form view configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfig {
    #[serde(default)]
    pub layout: FormLayout,
}

/// Per-type view configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewConfig {
    Table(TableConfig),
    Deck(DeckConfig),
    Form(FormConfig),
}

impl ViewConfig {
    pub fn view_type(&self) -> ViewType {
        match self {
            Self::Table(_) => ViewType::Table,
            Self::Deck(_) => ViewType::Deck,
            Self::Form(_) => ViewType::Form,
        }
    }

    /// Every entity field key the config refers to.
    pub fn referenced_fields(&self) -> Vec<&str> {
        match self {
            Self::Table(t) => t.columns.iter().map(String::as_str).collect(),
            Self::Deck(d) => {
                let mut refs = vec![d.title_field.as_str(), d.subtitle_field.as_str()];
                refs.extend(d.status_field.as_deref());
                refs.extend(d.image_field.as_deref());
                refs
            }
            Self::Form(_) => Vec::new(),
        }
    }

    fn parse(view_id: &str, view_type: ViewType, config: Value) -> Result<Self, ModelError> {
        // Form configs are entirely optional; an absent payload is an empty one.
        let config = match config {
            Value::Null => Value::Object(serde_json::Map::new()),
            other => other,
        };
        let invalid = |e: serde_json::Error| ModelError::InvalidConfig {
            view_id: view_id.to_string(),
            view_type: view_type.to_string(),
            reason: e.to_string(),
        };
        match view_type {
            ViewType::Table => serde_json::from_value(config)
                .map(Self::Table)
                .map_err(invalid),
            ViewType::Deck => serde_json::from_value(config)
                .map(Self::Deck)
                .map_err(invalid),
            ViewType::Form => serde_json::from_value(config)
                .map(Self::Form)
                .map_err(invalid),
        }
    }

    fn to_value(&self) -> Value {
        let result = match self {
            Self::Table(t) => serde_json::to_value(t),
            Self::Deck(d) => serde_json::to_value(d),
            Self::Form(f) => serde_json::to_value(f),
        };
        // Plain derive structs of strings and integers always serialize.
        result.unwrap_or(Value::Null)
    }
}

/// A named, role-scoped presentation of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawViewDefinition", into = "RawViewDefinition")]
pub struct ViewDefinition {
    pub id: String,
    /// Name of the entity this view presents.
    pub entity: String,
    pub name: String,
    pub icon: Option<String>,
    pub config: ViewConfig,
    pub actions: Vec<ActionDef>,
    /// Roles allowed to see the view; may contain the wildcard.
    pub roles: Vec<Role>,
}

impl ViewDefinition {
    pub fn view_type(&self) -> ViewType {
        self.config.view_type()
    }

    /// Whether `role` may see this view.
    pub fn permits(&self, role: &Role) -> bool {
        Role::set_permits(&self.roles, role)
    }

    pub fn action(&self, id: &str) -> Option<&ActionDef> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// First action of the given type, in declaration order.
    pub fn first_action_of(&self, action_type: ActionType) -> Option<&ActionDef> {
        self.actions.iter().find(|a| a.action_type == action_type)
    }

    /// Copy of this view with only the actions `role` may trigger.
    pub fn scoped_to(&self, role: &Role) -> Self {
        let mut scoped = self.clone();
        scoped.actions.retain(|a| a.permits(role));
        scoped
    }

    /// Action ids that occur more than once, each reported once.
    pub fn duplicate_action_ids(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut dups = Vec::new();
        for a in &self.actions {
            if !seen.insert(a.id.as_str()) && !dups.contains(&a.id.as_str()) {
                dups.push(a.id.as_str());
            }
        }
        dups
    }

    pub fn as_table(&self) -> Option<&TableConfig> {
        match &self.config {
            ViewConfig::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_deck(&self) -> Option<&DeckConfig> {
        match &self.config {
            ViewConfig::Deck(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_form(&self) -> Option<&FormConfig> {
        match &self.config {
            ViewConfig::Form(f) => Some(f),
            _ => None,
        }
    }
}

/// Wire mirror of [`ViewDefinition`] with an untyped `config`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawViewDefinition {
    id: String,
    entity: String,
    #[serde(rename = "type")]
    view_type: ViewType,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
    #[serde(default)]
    config: Value,
    #[serde(default)]
    actions: Vec<ActionDef>,
    #[serde(default)]
    roles: Vec<Role>,
}

impl TryFrom<RawViewDefinition> for ViewDefinition {
    type Error = ModelError;

    fn try_from(raw: RawViewDefinition) -> Result<Self, Self::Error> {
        let config = ViewConfig::parse(&raw.id, raw.view_type, raw.config)?;
        Ok(Self {
            id: raw.id,
            entity: raw.entity,
            name: raw.name,
            icon: raw.icon,
            config,
            actions: raw.actions,
            roles: raw.roles,
        })
    }
}

impl From<ViewDefinition> for RawViewDefinition {
    fn from(view: ViewDefinition) -> Self {
        Self {
            view_type: view.view_type(),
            config: view.config.to_value(),
            id: view.id,
            entity: view.entity,
            name: view.name,
            icon: view.icon,
            actions: view.actions,
            roles: view.roles,
        }
    }
}
