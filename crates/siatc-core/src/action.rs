//! # Action Definitions
//!
//! A view's actions are the operations a user can trigger from it. The
//! renderers never execute actions; they hand them back to the host.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ModelError;
use crate::role::Role;

/// Kind of operation an action performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Create,
    Update,
    Delete,
    Navigate,
    Custom,
}

impl ActionType {
    pub fn all() -> &'static [ActionType] {
        &[
            Self::Create,
            Self::Update,
            Self::Delete,
            Self::Navigate,
            Self::Custom,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Navigate => "navigate",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ModelError::UnknownActionType(s.to_string()))
    }
}

/// A user-triggerable operation attached to a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDef {
    /// Identifier, unique within the view's action list.
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub icon: String,
    #[serde(rename = "type")]
    pub action_type: ActionType,
    /// Roles allowed to trigger the action. Absent means every role that
    /// can see the view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<Role>>,
}

impl ActionDef {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        icon: impl Into<String>,
        action_type: ActionType,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: icon.into(),
            action_type,
            roles: None,
        }
    }

    /// Builder: restrict the action to a role set.
    pub fn for_roles<I, R>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        self.roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    /// Whether `role` may trigger this action.
    pub fn permits(&self, role: &Role) -> bool {
        match &self.roles {
            None => true,
            Some(roles) => Role::set_permits(roles, role),
        }
    }

    /// Toolbar actions (`create`) render once; every other type renders
    /// per row.
    pub fn is_toolbar(&self) -> bool {
        self.action_type == ActionType::Create
    }
}
