//! # Record Validation
//!
//! Derives a JSON Schema (Draft 2020-12) from an entity definition and
//! validates records against it before they reach a data service.
//!
//! ## Derived Schema
//!
//! | Field type | Schema |
//! |------------|--------|
//! | text, textarea, email, phone, image | `string` |
//! | number | `number` |
//! | date, datetime | `string`, then parsed with `chrono` |
//! | boolean | `boolean` |
//! | enum | `enum` over the declared options |
//! | ref | `string` or `integer` |
//! | latlong | `string` matching `lat,long`, or blank when optional |
//!
//! Required fields that appear in forms are listed in `required` and, when
//! textual, must be non-empty. Every other field also accepts `null`.
//! Hidden and read-only fields are never required here: forms cannot
//! supply them, and the data service fills them in. Unknown keys are
//! allowed.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{json, Value};
use siatc_core::{EntityDefinition, FieldDef, FieldType, Record};
use thiserror::Error;

const LATLONG: &str = r"-?\d+(\.\d+)?\s*,\s*-?\d+(\.\d+)?";

/// Error from record validation.
#[derive(Error, Debug)]
pub enum RecordValidationError {
    /// The record did not conform to the entity schema.
    #[error("record validation failed for entity '{entity}':\n{violations}")]
    Invalid {
        /// Entity the record was validated against.
        entity: String,
        /// Every violation found.
        violations: ValidationViolations,
    },

    /// The derived schema could not be compiled.
    #[error("validator build error for entity '{entity}': {reason}")]
    ValidatorBuild {
        /// Entity whose schema failed to compile.
        entity: String,
        /// Compiler message.
        reason: String,
    },
}

/// A single validation violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the offending value (`/estado`), empty for the root.
    pub instance_path: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Whether any violation points at `/key`.
    pub fn touches(&self, key: &str) -> bool {
        let path = format!("/{key}");
        self.violations.iter().any(|v| v.instance_path == path)
    }

    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Compiled validator for the records of one entity.
pub struct RecordSchema {
    entity: String,
    schema: Value,
    validator: jsonschema::Validator,
    temporal_fields: Vec<(String, FieldType)>,
}

impl fmt::Debug for RecordSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSchema")
            .field("entity", &self.entity)
            .field("schema", &self.schema)
            .field("validator", &"[compiled]")
            .finish()
    }
}

impl RecordSchema {
    /// Derive and compile the schema for `entity`.
    ///
    /// # Errors
    ///
    /// Returns `RecordValidationError::ValidatorBuild` if the derived schema
    /// does not compile.
    pub fn for_entity(entity: &EntityDefinition) -> Result<Self, RecordValidationError> {
        let schema = derive_schema(entity);
        let validator =
            jsonschema::validator_for(&schema).map_err(|e| RecordValidationError::ValidatorBuild {
                entity: entity.name.clone(),
                reason: e.to_string(),
            })?;
        let temporal_fields = entity
            .fields
            .iter()
            .filter(|f| matches!(f.field_type, FieldType::Date | FieldType::Datetime))
            .map(|f| (f.key.clone(), f.field_type))
            .collect();
        Ok(Self {
            entity: entity.name.clone(),
            schema,
            validator,
            temporal_fields,
        })
    }

    /// The derived JSON Schema document.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Validate a record, collecting every violation.
    ///
    /// # Errors
    ///
    /// Returns `RecordValidationError::Invalid` listing all violations.
    pub fn validate(&self, record: &Record) -> Result<(), RecordValidationError> {
        let instance = Value::Object(record.clone());
        let mut violations: Vec<Violation> = self
            .validator
            .iter_errors(&instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        for (key, field_type) in &self.temporal_fields {
            if let Some(Value::String(s)) = record.get(key) {
                if !s.is_empty() && !is_valid_temporal(*field_type, s) {
                    violations.push(Violation {
                        instance_path: format!("/{key}"),
                        message: format!("{s:?} is not a valid {field_type}"),
                    });
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(RecordValidationError::Invalid {
                entity: self.entity.clone(),
                violations: ValidationViolations { violations },
            })
        }
    }
}

fn is_valid_temporal(field_type: FieldType, s: &str) -> bool {
    match field_type {
        FieldType::Date => NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok(),
        FieldType::Datetime => {
            DateTime::parse_from_rfc3339(s).is_ok()
                || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").is_ok()
                || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").is_ok()
        }
        _ => true,
    }
}

fn field_schema(field: &FieldDef, required: bool) -> Value {
    let typed = match field.field_type {
        FieldType::Text
        | FieldType::Textarea
        | FieldType::Email
        | FieldType::Phone
        | FieldType::Image => {
            if required {
                json!({ "type": "string", "minLength": 1 })
            } else {
                json!({ "type": "string" })
            }
        }
        FieldType::Latlong => {
            // An optional coordinate may be left blank.
            let pattern = if required {
                format!("^{LATLONG}$")
            } else {
                format!("^({LATLONG})?$")
            };
            json!({ "type": "string", "pattern": pattern })
        }
        FieldType::Number => json!({ "type": "number" }),
        FieldType::Date | FieldType::Datetime => {
            if required {
                json!({ "type": "string", "minLength": 1 })
            } else {
                json!({ "type": "string" })
            }
        }
        FieldType::Boolean => json!({ "type": "boolean" }),
        FieldType::Enum => json!({ "enum": field.options.clone().unwrap_or_default() }),
        FieldType::Ref => json!({ "type": ["string", "integer"] }),
    };
    if required {
        typed
    } else {
        json!({ "anyOf": [{ "type": "null" }, typed] })
    }
}

fn derive_schema(entity: &EntityDefinition) -> Value {
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();
    for field in &entity.fields {
        let is_required = field.is_required() && field.in_form();
        if is_required {
            required.push(Value::String(field.key.clone()));
        }
        properties.insert(field.key.clone(), field_schema(field, is_required));
    }
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": entity.name,
        "type": "object",
        "properties": properties,
        "required": required,
    })
}
