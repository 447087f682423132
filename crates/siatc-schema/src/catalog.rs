//! # Catalog Loading
//!
//! A catalog is a directory of static definitions:
//!
//! ```text
//! catalog/
//!   entities/   one EntityDefinition per file
//!   views/      one ViewDefinition, or a list of them, per file
//! ```
//!
//! Files ending in `.yaml`, `.yml`, or `.json` are read in lexicographic
//! order so that registration order is reproducible. Other files are
//! ignored. YAML documents are converted to JSON values before being
//! deserialized, so both formats go through the same serde path.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use siatc_core::{EntityDefinition, ViewDefinition};
use thiserror::Error;

/// Subdirectory holding entity definitions.
pub const ENTITIES_DIR: &str = "entities";
/// Subdirectory holding view definitions.
pub const VIEWS_DIR: &str = "views";

/// Error while loading a catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog directory or one of its subdirectories cannot be read.
    #[error("catalog directory error for '{path}': {reason}")]
    Directory {
        /// Directory path.
        path: String,
        /// Reason the directory could not be read.
        reason: String,
    },

    /// A definition file could not be read or parsed.
    #[error("document load error for '{path}': {reason}")]
    Document {
        /// Path to the file that failed to load.
        path: String,
        /// Reason the file could not be loaded.
        reason: String,
    },

    /// IO error reading a definition file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// The definitions read from a catalog directory.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Entity definitions in file order.
    pub entities: Vec<EntityDefinition>,
    /// View definitions in file order (list files expand in place).
    pub views: Vec<ViewDefinition>,
}

impl Catalog {
    /// Load every definition under `dir`.
    ///
    /// Both subdirectories are optional; a missing one contributes nothing.
    /// The root itself must exist.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Directory` if `dir` cannot be read and
    /// `CatalogError::Document` for the first file that fails to parse.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(CatalogError::Directory {
                path: dir.display().to_string(),
                reason: "not a directory".to_string(),
            });
        }

        let mut catalog = Catalog::default();

        for path in definition_files(&dir.join(ENTITIES_DIR))? {
            let entity: EntityDefinition = parse_file(&path)?;
            tracing::debug!(entity = %entity.name, path = %path.display(), "loaded entity definition");
            catalog.entities.push(entity);
        }

        for path in definition_files(&dir.join(VIEWS_DIR))? {
            let value = read_document(&path)?;
            let items = match value {
                Value::Array(items) => items,
                single => vec![single],
            };
            for item in items {
                let view: ViewDefinition = from_value(&path, item)?;
                tracing::debug!(view = %view.id, path = %path.display(), "loaded view definition");
                catalog.views.push(view);
            }
        }

        tracing::info!(
            dir = %dir.display(),
            entities = catalog.entities.len(),
            views = catalog.views.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.views.is_empty()
    }
}

/// Definition files directly under `dir`, sorted by name.
fn definition_files(dir: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(dir).map_err(|e| CatalogError::Directory {
        path: dir.display().to_string(),
        reason: format!("cannot read directory: {e}"),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && is_definition_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn is_definition_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml" | "json")
    )
}

/// Read a YAML or JSON file into a JSON value, choosing the parser by
/// extension.
pub fn read_document(path: &Path) -> Result<Value, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Document {
        path: path.display().to_string(),
        reason: format!("cannot read file: {e}"),
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "yaml" | "yml" => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(&content).map_err(|e| CatalogError::Document {
                    path: path.display().to_string(),
                    reason: format!("invalid YAML: {e}"),
                })?;
            yaml_to_json_value(&yaml).map_err(|e| CatalogError::Document {
                path: path.display().to_string(),
                reason: format!("YAML-to-JSON conversion failed: {e}"),
            })
        }
        _ => serde_json::from_str(&content).map_err(|e| CatalogError::Document {
            path: path.display().to_string(),
            reason: format!("invalid JSON: {e}"),
        }),
    }
}

fn parse_file<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let value = read_document(path)?;
    from_value(path, value)
}

fn from_value<T: DeserializeOwned>(path: &Path, value: Value) -> Result<T, CatalogError> {
    serde_json::from_value(value).map_err(|e| CatalogError::Document {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Definition files use only the JSON-compatible subset of YAML. Tags are
/// dropped and the tagged value is kept.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(yaml_to_json_value).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key type: {other:?}")),
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}
