//! # Entity Definitions
//!
//! An entity is a named record schema: its fields plus which field is the
//! record identifier and which one labels a record for humans (used by
//! reference selectors and deck titles).

use serde::{Deserialize, Serialize};

use crate::field::FieldDef;

/// A named, typed record schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDefinition {
    /// Registry key, e.g. `tickets`.
    pub name: String,
    pub label: String,
    /// Key of the field holding the record identifier.
    pub id_field: String,
    /// Key of the field holding the human-readable record label.
    pub label_field: String,
    pub fields: Vec<FieldDef>,
}

impl EntityDefinition {
    /// Look up a field by key.
    pub fn field(&self, key: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    /// Label for a column key, falling back to the raw key when no field
    /// matches.
    pub fn label_for<'a>(&'a self, key: &'a str) -> &'a str {
        self.field(key).map(|f| f.label.as_str()).unwrap_or(key)
    }

    /// Fields that produce form controls, in declaration order.
    pub fn form_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.in_form())
    }

    /// Field keys that occur more than once, each reported once.
    pub fn duplicate_keys(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut dups = Vec::new();
        for f in &self.fields {
            if !seen.insert(f.key.as_str()) && !dups.contains(&f.key.as_str()) {
                dups.push(f.key.as_str());
            }
        }
        dups
    }
}
