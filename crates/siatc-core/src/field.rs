//! # Field Definitions
//!
//! Defines `FieldType`, the closed enumeration of the twelve field types an
//! entity may declare, and `FieldDef`, a single field of an entity schema.
//! Every `match` on `FieldType` must be exhaustive; adding a type forces
//! every renderer and the record schema generator to handle it.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ModelError;

/// The declared type of an entity field.
///
/// | Type | Stored as | Form control |
/// |------|-----------|--------------|
/// | `text` | string | input |
/// | `textarea` | string | multi-line input |
/// | `number` | number | numeric input |
/// | `date` | `YYYY-MM-DD` string | date picker |
/// | `datetime` | RFC 3339 string | date-time picker |
/// | `boolean` | boolean | checkbox |
/// | `enum` | one of `options` | select |
/// | `image` | URL string | input |
/// | `ref` | id of a `refEntity` record | reference selector |
/// | `email` | string | email input |
/// | `phone` | string | phone input |
/// | `latlong` | `"lat,long"` string | input |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Single-line free text.
    Text,
    /// Multi-line free text.
    Textarea,
    /// Numeric value.
    Number,
    /// Calendar date.
    Date,
    /// Date and time.
    Datetime,
    /// True/false flag.
    Boolean,
    /// One value out of the field's declared `options`.
    Enum,
    /// Image URL.
    Image,
    /// Reference to a record of another entity.
    Ref,
    /// E-mail address.
    Email,
    /// Phone number.
    Phone,
    /// Geographic coordinate pair.
    Latlong,
}

/// Total number of field types.
pub const FIELD_TYPE_COUNT: usize = 12;

impl FieldType {
    /// Returns every field type in declaration order.
    pub fn all() -> &'static [FieldType] {
        &[
            Self::Text,
            Self::Textarea,
            Self::Number,
            Self::Date,
            Self::Datetime,
            Self::Boolean,
            Self::Enum,
            Self::Image,
            Self::Ref,
            Self::Email,
            Self::Phone,
            Self::Latlong,
        ]
    }

    /// Returns the lowercase identifier, matching the serde format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Number => "number",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Boolean => "boolean",
            Self::Enum => "enum",
            Self::Image => "image",
            Self::Ref => "ref",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Latlong => "latlong",
        }
    }

    /// Whether values of this type are free-form strings, where an empty
    /// string is a meaningful value rather than "no value".
    pub fn is_textual(&self) -> bool {
        match self {
            Self::Text | Self::Textarea | Self::Email | Self::Phone | Self::Image | Self::Latlong => {
                true
            }
            Self::Number
            | Self::Date
            | Self::Datetime
            | Self::Boolean
            | Self::Enum
            | Self::Ref => false,
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ModelError::UnknownFieldType(s.to_string()))
    }
}

/// A single field of an entity schema.
///
/// `options` is meaningful only for `enum` fields and `ref_entity` only for
/// `ref` fields; the registry consistency check reports definitions that
/// violate either pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    /// Record key, unique within the entity.
    pub key: String,
    /// Display label (usually a translation key).
    pub label: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Hidden fields are never rendered as form controls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    /// Required fields must be non-empty on submit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// `Some(false)` excludes the field from forms; absent means editable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
    /// Allowed values of an `enum` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Target entity of a `ref` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_entity: Option<String>,
}

impl FieldDef {
    /// Create a plain field with no flags set.
    pub fn new(key: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            field_type,
            hidden: None,
            required: None,
            editable: None,
            options: None,
            ref_entity: None,
        }
    }

    /// Builder: mark the field required.
    pub fn required(mut self) -> Self {
        self.required = Some(true);
        self
    }

    /// Builder: mark the field hidden.
    pub fn hidden(mut self) -> Self {
        self.hidden = Some(true);
        self
    }

    /// Builder: mark the field read-only.
    pub fn read_only(mut self) -> Self {
        self.editable = Some(false);
        self
    }

    /// Builder: set enum options.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    /// Builder: set the referenced entity.
    pub fn referencing(mut self, entity: impl Into<String>) -> Self {
        self.ref_entity = Some(entity.into());
        self
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden.unwrap_or(false)
    }

    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }

    /// Editable unless explicitly `editable: false`.
    pub fn is_editable(&self) -> bool {
        self.editable != Some(false)
    }

    /// Whether the field gets a form control: not hidden and not read-only.
    pub fn in_form(&self) -> bool {
        !self.is_hidden() && self.is_editable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_field_types_count() {
        assert_eq!(FieldType::all().len(), FIELD_TYPE_COUNT);
    }

    #[test]
    fn test_as_str_matches_serde() {
        for t in FieldType::all() {
            let json = serde_json::to_string(t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
    }

    #[test]
    fn test_from_str_roundtrip_and_unknown() {
        for t in FieldType::all() {
            assert_eq!(t.as_str().parse::<FieldType>().unwrap(), *t);
        }
        assert_eq!(
            "money".parse::<FieldType>(),
            Err(ModelError::UnknownFieldType("money".into()))
        );
    }

    #[test]
    fn test_field_def_camel_case_keys() {
        let json = serde_json::json!({
            "key": "clienteId",
            "label": "TICKETS.CLIENT",
            "type": "ref",
            "refEntity": "users",
            "required": true
        });
        let field: FieldDef = serde_json::from_value(json).unwrap();
        assert_eq!(field.field_type, FieldType::Ref);
        assert_eq!(field.ref_entity.as_deref(), Some("users"));
        assert!(field.is_required());
        assert!(field.in_form());
    }

    #[test]
    fn test_form_eligibility() {
        let plain = FieldDef::new("a", "A", FieldType::Text);
        assert!(plain.in_form());
        assert!(!plain.clone().hidden().in_form());
        assert!(!plain.clone().read_only().in_form());
        assert!(!plain.required().read_only().in_form());
    }

    #[test]
    fn test_editable_true_is_editable() {
        let mut f = FieldDef::new("a", "A", FieldType::Text);
        f.editable = Some(true);
        assert!(f.is_editable());
    }
}
