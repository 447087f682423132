//! # siatc-views — Generic Renderers
//!
//! Three interchangeable view-models that consume `(view, entity, data)` and
//! present or collect records without any per-entity code:
//!
//! - **Table** (`table.rs`): search, single-column sort, pagination,
//!   toolbar and per-row actions.
//! - **Form** (`form.rs`): one control per editable field, required-field
//!   validation, save/cancel events, a submitting flag owned by the caller.
//! - **Deck** (`deck.rs`): searchable cards with title, subtitle, status and
//!   image slots; card clicks navigate.
//!
//! ## Execution Model
//!
//! Every view-model owns its state exclusively and is mutated synchronously
//! by method calls. Derived state (filtered, sorted, paged rows) is
//! recomputed after every input change. Renderers never persist anything:
//! user intent leaves as a [`ViewEvent`] or [`FormEvent`] for the host to
//! execute.
//!
//! ## Crate Policy
//!
//! - Depends only on `siatc-core`.
//! - No I/O, no async, no logging. Construction against the wrong kind of
//!   view is a typed [`ViewError`].

pub mod deck;
pub mod error;
pub mod event;
pub mod form;
mod search;
pub mod table;

pub use deck::{Card, CardImage, DeckView};
pub use error::ViewError;
pub use event::{FormEvent, ViewEvent};
pub use form::{Control, ControlError, ControlKind, FormView, InputFlavour};
pub use table::{Column, Row, SortDirection, SortState, TableView};
