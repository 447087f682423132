//! # Error Types
//!
//! Errors raised while constructing or parsing schema model values. All
//! errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! Lookup misses are never errors in this workspace; they are `Option`s.
//! The variants here cover definitions that cannot be represented at all.

use thiserror::Error;

/// Error building a schema model value from external input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A view's `config` payload does not fit the shape required by its `type`.
    #[error("invalid {view_type} config for view '{view_id}': {reason}")]
    InvalidConfig {
        /// Identifier of the offending view.
        view_id: String,
        /// The declared view type.
        view_type: String,
        /// Why the payload was rejected.
        reason: String,
    },

    /// Unknown field type identifier.
    #[error("unknown field type: {0}")]
    UnknownFieldType(String),

    /// Unknown action type identifier.
    #[error("unknown action type: {0}")]
    UnknownActionType(String),

    /// Unknown view type identifier.
    #[error("unknown view type: {0}")]
    UnknownViewType(String),
}
