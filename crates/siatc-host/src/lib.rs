//! # siatc-host — View Host
//!
//! The host is the collaborator the generic renderers hand their events to.
//! It resolves which views a role may open, loads records through a
//! [`DataService`], builds the matching renderer, and executes the actions
//! and form saves the renderers emit.
//!
//! ## Architecture
//!
//! ```text
//! Registry (Arc) ──▶ ViewHost ──▶ TableView / DeckView / FormView
//!                       │
//!                       └──▶ DataService (MemoryDataService, ...)
//! ```
//!
//! Role gating is closed-world: a view the role cannot see is `Forbidden`,
//! whether or not it exists under another role.
//!
//! ## Crate Policy
//!
//! - Locks are `parking_lot` and never held across `.await`.
//! - Persistence happens only here, never in a renderer.

pub mod config;
pub mod data;
pub mod host;
pub mod memory;

pub use config::HostConfig;
pub use data::{record_id, DataError, DataService};
pub use host::{normalize_values, HostError, Intent, MenuGroup, OpenView, ViewHost};
pub use memory::MemoryDataService;
