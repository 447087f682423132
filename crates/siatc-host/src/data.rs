//! # Data Service Contract
//!
//! The host reads and writes records through this trait. Records are keyed
//! by the value of the entity's `idField`, compared by display string so
//! that `4` and `"4"` name the same record.

use std::future::Future;

use siatc_core::{display_string, EntityDefinition, Record};
use thiserror::Error;

/// Error from a data service.
#[derive(Error, Debug)]
pub enum DataError {
    /// No record of `entity` has this id.
    #[error("no '{entity}' record with id '{id}'")]
    NotFound { entity: String, id: String },

    /// A record with this id already exists.
    #[error("'{entity}' record with id '{id}' already exists")]
    Duplicate { entity: String, id: String },

    /// Seed data could not be read.
    #[error("seed data error for '{path}': {reason}")]
    Seed { path: String, reason: String },

    /// Backend failure.
    #[error("data backend error: {0}")]
    Backend(String),
}

/// Asynchronous record store used by the host.
pub trait DataService: Send + Sync {
    /// Every record of `entity`.
    fn list(
        &self,
        entity: &EntityDefinition,
    ) -> impl Future<Output = Result<Vec<Record>, DataError>> + Send;

    /// One record by id; `None` when absent.
    fn get(
        &self,
        entity: &EntityDefinition,
        id: &str,
    ) -> impl Future<Output = Result<Option<Record>, DataError>> + Send;

    /// Store a new record and return it as stored.
    fn create(
        &self,
        entity: &EntityDefinition,
        record: Record,
    ) -> impl Future<Output = Result<Record, DataError>> + Send;

    /// Apply `changes` to an existing record and return it as stored.
    fn update(
        &self,
        entity: &EntityDefinition,
        id: &str,
        changes: Record,
    ) -> impl Future<Output = Result<Record, DataError>> + Send;

    fn delete(
        &self,
        entity: &EntityDefinition,
        id: &str,
    ) -> impl Future<Output = Result<(), DataError>> + Send;
}

/// The id of `record` under `entity`, or `None` if it has none.
pub fn record_id(entity: &EntityDefinition, record: &Record) -> Option<String> {
    let id = record.get(&entity.id_field).map(display_string)?;
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}
