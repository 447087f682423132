//! # Role Identifiers
//!
//! Newtype wrapper for role identifiers. Views and actions carry role sets;
//! the host gates visibility by checking the caller's role against them.
//!
//! The wildcard role `ALL` in a role set grants access to every role.

use serde::{Deserialize, Serialize};

/// A role identifier such as `ADMIN`, `TECNICO`, or `USUARIO`.
///
/// Role identifiers are opaque and compared exactly (case-sensitive).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// The wildcard identifier meaning "all roles".
    pub const WILDCARD: &'static str = "ALL";

    /// Create a role from any string-like value.
    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    /// The wildcard role.
    pub fn wildcard() -> Self {
        Self(Self::WILDCARD.to_string())
    }

    /// Whether this role is the wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.0 == Self::WILDCARD
    }

    /// Access the inner identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a role set admits `role`, either by exact membership or
    /// through the wildcard.
    pub fn set_permits(roles: &[Role], role: &Role) -> bool {
        roles.iter().any(|r| r.is_wildcard() || r == role)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Self(s)
    }
}
