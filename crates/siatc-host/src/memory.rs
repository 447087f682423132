//! # In-Memory Data Service
//!
//! Thread-safe, cloneable record store keyed by entity name. Clones share
//! the same tables. Used by the CLI and by tests; seedable from a directory
//! of `<entity>.json` files, each holding an array of records.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use siatc_core::{display_string, EntityDefinition, FieldType, Record};
use uuid::Uuid;

use crate::data::{record_id, DataError, DataService};

#[derive(Debug, Clone, Default)]
pub struct MemoryDataService {
    tables: Arc<RwLock<HashMap<String, Vec<Record>>>>,
}

impl MemoryDataService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append records to an entity's table without id checks.
    pub fn seed(&self, entity: impl Into<String>, records: Vec<Record>) {
        self.tables
            .write()
            .entry(entity.into())
            .or_default()
            .extend(records);
    }

    /// Number of records stored for an entity.
    pub fn len(&self, entity: &str) -> usize {
        self.tables.read().get(entity).map_or(0, Vec::len)
    }

    /// Load every `*.json` file under `dir`. The file stem names the entity.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Seed` if the directory or a file cannot be read,
    /// or a file is not a JSON array of objects.
    pub async fn load_dir(dir: impl AsRef<Path>) -> Result<Self, DataError> {
        let dir = dir.as_ref();
        let seed_err = |path: &Path, reason: String| DataError::Seed {
            path: path.display().to_string(),
            reason,
        };

        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| seed_err(dir, format!("cannot read directory: {e}")))?;
        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| seed_err(dir, format!("cannot read directory: {e}")))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                files.push(path);
            }
        }
        files.sort();

        let service = Self::new();
        for path in files {
            let Some(entity) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| seed_err(&path, format!("cannot read file: {e}")))?;
            let records: Vec<Record> = serde_json::from_str(&content)
                .map_err(|e| seed_err(&path, format!("expected an array of records: {e}")))?;
            tracing::debug!(entity, records = records.len(), "seeded entity");
            service.seed(entity, records);
        }
        tracing::info!(dir = %dir.display(), "seed data loaded");
        Ok(service)
    }
}

fn position(table: &[Record], entity: &EntityDefinition, id: &str) -> Option<usize> {
    table
        .iter()
        .position(|r| record_id(entity, r).as_deref() == Some(id))
}

/// Id for a new record: one past the largest stored id when the id field
/// is numeric, a v4 UUID otherwise.
fn next_id(entity: &EntityDefinition, table: &[Record]) -> Value {
    let numeric = entity
        .field(&entity.id_field)
        .is_some_and(|f| f.field_type == FieldType::Number);
    if !numeric {
        return Value::String(Uuid::new_v4().to_string());
    }
    let max = table
        .iter()
        .filter_map(|r| r.get(&entity.id_field).and_then(Value::as_i64))
        .max()
        .unwrap_or(0);
    Value::from(max + 1)
}

impl DataService for MemoryDataService {
    async fn list(&self, entity: &EntityDefinition) -> Result<Vec<Record>, DataError> {
        Ok(self
            .tables
            .read()
            .get(&entity.name)
            .cloned()
            .unwrap_or_default())
    }

    async fn get(&self, entity: &EntityDefinition, id: &str) -> Result<Option<Record>, DataError> {
        let tables = self.tables.read();
        let Some(table) = tables.get(&entity.name) else {
            return Ok(None);
        };
        Ok(position(table, entity, id).map(|i| table[i].clone()))
    }

    async fn create(&self, entity: &EntityDefinition, mut record: Record) -> Result<Record, DataError> {
        let mut tables = self.tables.write();
        let table = tables.entry(entity.name.clone()).or_default();
        let id = match record_id(entity, &record) {
            Some(id) => id,
            None => {
                let value = next_id(entity, table);
                let id = display_string(&value);
                record.insert(entity.id_field.clone(), value);
                id
            }
        };

        if position(table, entity, &id).is_some() {
            return Err(DataError::Duplicate {
                entity: entity.name.clone(),
                id,
            });
        }
        table.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        entity: &EntityDefinition,
        id: &str,
        changes: Record,
    ) -> Result<Record, DataError> {
        let mut tables = self.tables.write();
        let not_found = || DataError::NotFound {
            entity: entity.name.clone(),
            id: id.to_string(),
        };
        let table = tables.get_mut(&entity.name).ok_or_else(not_found)?;
        let slot = position(table, entity, id).ok_or_else(not_found)?;
        let stored = &mut table[slot];
        for (key, value) in changes {
            // The id is immutable.
            if key != entity.id_field {
                stored.insert(key, value);
            }
        }
        Ok(stored.clone())
    }

    async fn delete(&self, entity: &EntityDefinition, id: &str) -> Result<(), DataError> {
        let mut tables = self.tables.write();
        let not_found = || DataError::NotFound {
            entity: entity.name.clone(),
            id: id.to_string(),
        };
        let table = tables.get_mut(&entity.name).ok_or_else(not_found)?;
        let slot = position(table, entity, id).ok_or_else(not_found)?;
        table.remove(slot);
        Ok(())
    }
}
