//! # siatc-core — Foundational Types for the SIATC View Engine
//!
//! This crate defines the schema model that every other crate in the
//! workspace consumes: entities and their fields, views and their
//! per-type configuration, actions, role identifiers, and the record
//! representation the generic renderers operate on. It depends on nothing
//! internal.
//!
//! ## Key Design Principles
//!
//! 1. **Closed enumerations.** `FieldType`, `ActionType`, and `ViewType` are
//!    exhaustive enums. Every renderer dispatches with a `match`, so adding a
//!    field type forces every consumer to handle it.
//!
//! 2. **Typed view configuration.** `ViewConfig` is a tagged union keyed by
//!    the view's `type`. The untyped `config` payload of a definition file is
//!    parsed into its variant at deserialization time; a table config on a
//!    deck view is a load error, not a render-time surprise.
//!
//! 3. **One value ordering.** Sorting and searching go through
//!    [`record::compare_values`] and [`record::display_string`]. Mixed-type
//!    comparisons have a single documented total order.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `siatc-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Definitions derive `Debug`, `Clone`, `Serialize`, `Deserialize`.

pub mod action;
pub mod entity;
pub mod error;
pub mod field;
pub mod record;
pub mod role;
pub mod view;

// Re-export primary types for ergonomic imports.
pub use action::{ActionDef, ActionType};
pub use entity::EntityDefinition;
pub use error::ModelError;
pub use field::{FieldDef, FieldType, FIELD_TYPE_COUNT};
pub use record::{compare_values, display_string, is_empty_value, matches_query, Record};
pub use role::Role;
pub use view::{
    DeckConfig, FormConfig, FormLayout, TableConfig, ViewConfig, ViewDefinition, ViewType,
    DEFAULT_PAGE_SIZE,
};
