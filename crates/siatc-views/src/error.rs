//! Renderer construction and action errors.

use siatc_core::ViewType;
use thiserror::Error;

/// Error raised when a renderer is built from, or asked to act on, a
/// definition it cannot serve.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The view's type does not match the renderer.
    #[error("view '{view_id}' is a {found} view, expected {expected}")]
    WrongViewType {
        view_id: String,
        expected: ViewType,
        found: ViewType,
    },

    /// The entity passed alongside the view is not the one it presents.
    #[error("view '{view_id}' presents entity '{expected}', got '{found}'")]
    EntityMismatch {
        view_id: String,
        expected: String,
        found: String,
    },

    /// The view declares no action with this id.
    #[error("view '{view_id}' has no action '{action_id}'")]
    UnknownAction { view_id: String, action_id: String },
}

/// Check that `view` is of `expected` type and presents `entity`.
pub(crate) fn ensure_view(
    view: &siatc_core::ViewDefinition,
    entity: &siatc_core::EntityDefinition,
    expected: ViewType,
) -> Result<(), ViewError> {
    if view.view_type() != expected {
        return Err(ViewError::WrongViewType {
            view_id: view.id.clone(),
            expected,
            found: view.view_type(),
        });
    }
    if view.entity != entity.name {
        return Err(ViewError::EntityMismatch {
            view_id: view.id.clone(),
            expected: view.entity.clone(),
            found: entity.name.clone(),
        });
    }
    Ok(())
}
