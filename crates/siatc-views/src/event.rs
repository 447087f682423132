//! Events a renderer hands back to its host.

use serde::Serialize;
use siatc_core::{ActionDef, Record};

/// An action triggered from a table or deck.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum ViewEvent {
    Action {
        action: ActionDef,
        /// The record the action applies to; absent for toolbar actions.
        #[serde(skip_serializing_if = "Option::is_none")]
        item: Option<Record>,
    },
}

impl ViewEvent {
    pub fn action(&self) -> &ActionDef {
        match self {
            Self::Action { action, .. } => action,
        }
    }

    pub fn item(&self) -> Option<&Record> {
        match self {
            Self::Action { item, .. } => item.as_ref(),
        }
    }
}

/// Output of a form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "values", rename_all = "lowercase")]
pub enum FormEvent {
    /// The submitted control values, keyed by field.
    Save(Record),
    /// The user closed the form without saving.
    Cancel,
}
