//! # siatc-registry — Entity/View Registry
//!
//! The registry is the process-wide store of entity and view definitions.
//! It is populated once at startup (from a catalog directory or from code)
//! and then only read. It is `Send + Sync` and shared behind an `Arc`.
//!
//! ## Contract
//!
//! - Registration never fails. Re-registering a key replaces the previous
//!   definition in place (last write wins).
//! - Lookups never fail. A miss is `None`.
//! - [`Registry::get_views_for_role`] is the only visibility mechanism: it
//!   returns exactly the views whose role set contains the role or `ALL`.
//!
//! Consistency of the registered definitions (field references, id/label
//! fields, enum options, ref targets, action ids, role sets) is checked on
//! demand by [`Registry::check`], which reports every violation instead of
//! rejecting registrations one by one.

pub mod check;
pub mod registry;

pub use check::ConsistencyViolation;
pub use registry::{Registry, RegistryError};
