//! # siatc-schema — Catalog Loading & Record Validation
//!
//! ## Catalog Loading (`catalog`)
//!
//! The [`catalog`] module reads entity and view definition files from a
//! catalog directory (`entities/` and `views/`, YAML or JSON) into typed
//! definitions. View configs are parsed into their per-type variant here, so
//! a malformed config fails at load time with the offending file path.
//!
//! ## Record Validation (`record`)
//!
//! The [`record`] module derives a JSON Schema (Draft 2020-12) from an
//! [`EntityDefinition`](siatc_core::EntityDefinition) and validates records
//! against it with the `jsonschema` crate. Date and date-time fields are
//! additionally checked with `chrono`.
//!
//! ## Crate Policy
//!
//! - Depends only on `siatc-core` internally.
//! - Loading errors name the file and the reason.
//! - Record validation collects every violation; it never stops at the first.

pub mod catalog;
pub mod record;

pub use catalog::{Catalog, CatalogError};
pub use record::{RecordSchema, RecordValidationError, ValidationViolations, Violation};
