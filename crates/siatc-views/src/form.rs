//! # Form Renderer
//!
//! Builds one control per form-eligible field of an entity (not hidden and
//! not `editable: false`) and collects values for a create or an edit.
//!
//! ## Submit Lifecycle
//!
//! ```text
//! Idle ──submit (valid)──▶ Submitting ──finish_submit──▶ Idle
//!   │
//!   └──submit (invalid)──▶ Idle, every control touched, nothing emitted
//! ```
//!
//! The form does not know whether a save succeeded. The host clears the
//! submitting state once its data call settles. A second `submit` while
//! submitting is not rejected here; [`FormView::can_submit`] is what a UI
//! binds its button to.

use serde_json::Value;
use siatc_core::{
    is_empty_value, EntityDefinition, FieldDef, FieldType, FormLayout, Record, ViewDefinition,
    ViewType,
};

use crate::error::{ensure_view, ViewError};
use crate::event::FormEvent;

/// Flavour of a single-line input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFlavour {
    Text,
    Number,
    Email,
    Phone,
    Url,
    LatLong,
}

/// Kind of widget a field is edited with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlKind {
    Input(InputFlavour),
    TextArea,
    DatePicker,
    DateTimePicker,
    Checkbox,
    /// Closed choice over the field's declared options.
    Select { options: Vec<String> },
    /// Record picker over another entity.
    Reference { entity: String },
}

impl ControlKind {
    /// Control kind for a field.
    pub fn for_field(field: &FieldDef) -> Self {
        match field.field_type {
            FieldType::Text => Self::Input(InputFlavour::Text),
            FieldType::Number => Self::Input(InputFlavour::Number),
            FieldType::Email => Self::Input(InputFlavour::Email),
            FieldType::Phone => Self::Input(InputFlavour::Phone),
            FieldType::Image => Self::Input(InputFlavour::Url),
            FieldType::Latlong => Self::Input(InputFlavour::LatLong),
            FieldType::Textarea => Self::TextArea,
            FieldType::Date => Self::DatePicker,
            FieldType::Datetime => Self::DateTimePicker,
            FieldType::Boolean => Self::Checkbox,
            FieldType::Enum => Self::Select {
                options: field.options.clone().unwrap_or_default(),
            },
            FieldType::Ref => Self::Reference {
                entity: field.ref_entity.clone().unwrap_or_default(),
            },
        }
    }

    /// Value a control starts with when it has nothing to show.
    fn empty_value(&self) -> Value {
        match self {
            Self::Checkbox => Value::Bool(false),
            _ => Value::String(String::new()),
        }
    }
}

/// Per-control validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError {
    /// A required control is empty.
    Required,
}

impl ControlError {
    /// Translation key a UI shows next to the control.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::Required => "FORM.REQUIRED",
        }
    }
}

/// One form control.
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    pub key: String,
    pub label: String,
    pub kind: ControlKind,
    pub required: bool,
    pub value: Value,
    pub touched: bool,
}

impl Control {
    fn new(field: &FieldDef, seed: Option<&Value>) -> Self {
        let kind = ControlKind::for_field(field);
        let value = match seed {
            Some(v) if !v.is_null() => v.clone(),
            _ => kind.empty_value(),
        };
        Self {
            key: field.key.clone(),
            label: field.label.clone(),
            kind,
            required: field.is_required(),
            value,
            touched: false,
        }
    }

    pub fn errors(&self) -> Vec<ControlError> {
        if self.required && is_empty_value(Some(&self.value)) {
            vec![ControlError::Required]
        } else {
            Vec::new()
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    /// Whether the UI should show this control's errors.
    pub fn shows_errors(&self) -> bool {
        self.touched && !self.is_valid()
    }
}

/// View-model of a form view.
#[derive(Debug, Clone)]
pub struct FormView {
    view: ViewDefinition,
    entity: EntityDefinition,
    layout: FormLayout,
    /// The record being edited; `None` when creating.
    record: Option<Record>,
    controls: Vec<Control>,
    initial: Vec<Value>,
    submitting: bool,
}

impl FormView {
    /// Build a form for creating (`data = None`) or editing a record.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::WrongViewType` if `view` is not a form view and
    /// `ViewError::EntityMismatch` if it presents another entity.
    pub fn new(
        view: ViewDefinition,
        entity: EntityDefinition,
        data: Option<Record>,
    ) -> Result<Self, ViewError> {
        ensure_view(&view, &entity, ViewType::Form)?;
        let layout = view.as_form().map(|f| f.layout).unwrap_or_default();
        let controls: Vec<Control> = entity
            .form_fields()
            .map(|f| Control::new(f, data.as_ref().and_then(|r| r.get(&f.key))))
            .collect();
        let initial = controls.iter().map(|c| c.value.clone()).collect();
        Ok(Self {
            view,
            entity,
            layout,
            record: data,
            controls,
            initial,
            submitting: false,
        })
    }

    /// Rebuild the whole control set for new inputs. On error the form is
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Same as [`FormView::new`].
    pub fn reinitialize(
        &mut self,
        view: ViewDefinition,
        entity: EntityDefinition,
        data: Option<Record>,
    ) -> Result<(), ViewError> {
        *self = Self::new(view, entity, data)?;
        Ok(())
    }

    pub fn view(&self) -> &ViewDefinition {
        &self.view
    }

    pub fn entity(&self) -> &EntityDefinition {
        &self.entity
    }

    pub fn layout(&self) -> FormLayout {
        self.layout
    }

    /// The record being edited, if any.
    pub fn record(&self) -> Option<&Record> {
        self.record.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.record.is_some()
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn control(&self, key: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.key == key)
    }

    fn control_mut(&mut self, key: &str) -> Option<&mut Control> {
        self.controls.iter_mut().find(|c| c.key == key)
    }

    /// Set a control's value. Returns `false` if the form has no such
    /// control.
    pub fn set_value(&mut self, key: &str, value: impl Into<Value>) -> bool {
        match self.control_mut(key) {
            Some(control) => {
                control.value = value.into();
                control.touched = true;
                true
            }
            None => false,
        }
    }

    /// Mark a control touched (the user left it).
    pub fn touch(&mut self, key: &str) -> bool {
        match self.control_mut(key) {
            Some(control) => {
                control.touched = true;
                true
            }
            None => false,
        }
    }

    /// Errors of one control; empty for valid or unknown controls.
    pub fn errors(&self, key: &str) -> Vec<ControlError> {
        self.control(key).map(Control::errors).unwrap_or_default()
    }

    pub fn is_valid(&self) -> bool {
        self.controls.iter().all(Control::is_valid)
    }

    /// Whether any control differs from the value it was seeded with.
    pub fn is_dirty(&self) -> bool {
        self.controls
            .iter()
            .zip(&self.initial)
            .any(|(c, v)| &c.value != v)
    }

    /// Current values of every control, keyed by field.
    pub fn values(&self) -> Record {
        self.controls
            .iter()
            .map(|c| (c.key.clone(), c.value.clone()))
            .collect()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Whether a submit button should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.submitting
    }

    /// Submit the form.
    ///
    /// An invalid form marks every control touched and emits nothing. A
    /// valid form emits `Save` with its values and enters the submitting
    /// state.
    pub fn submit(&mut self) -> Option<FormEvent> {
        if !self.is_valid() {
            for control in &mut self.controls {
                control.touched = true;
            }
            return None;
        }
        self.submitting = true;
        Some(FormEvent::Save(self.values()))
    }

    /// Leave the submitting state after the host's save settled.
    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }

    pub fn cancel(&self) -> FormEvent {
        FormEvent::Cancel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn notes() -> EntityDefinition {
        EntityDefinition {
            name: "notes".into(),
            label: "Notes".into(),
            id_field: "id".into(),
            label_field: "name".into(),
            fields: vec![
                FieldDef::new("id", "ID", FieldType::Number).read_only(),
                FieldDef::new("name", "Name", FieldType::Text).required(),
                FieldDef::new("note", "Note", FieldType::Text),
            ],
        }
    }

    fn form_view(entity: &str) -> ViewDefinition {
        serde_json::from_value(json!({
            "id": format!("{entity}-form"),
            "entity": entity,
            "type": "form",
            "name": "Form",
            "config": { "layout": "double" },
            "roles": ["ALL"]
        }))
        .unwrap()
    }

    fn all_types() -> EntityDefinition {
        let fields = FieldType::all()
            .iter()
            .map(|t| {
                let f = FieldDef::new(t.as_str(), t.as_str(), *t);
                match t {
                    FieldType::Enum => f.with_options(["A", "B"]),
                    FieldType::Ref => f.referencing("users"),
                    _ => f,
                }
            })
            .collect();
        EntityDefinition {
            name: "everything".into(),
            label: "Everything".into(),
            id_field: "text".into(),
            label_field: "text".into(),
            fields,
        }
    }

    #[test]
    fn test_required_empty_blocks_submit_and_touches() {
        let mut form = FormView::new(form_view("notes"), notes(), None).unwrap();
        assert!(form.submit().is_none());
        assert!(!form.is_submitting());
        let name = form.control("name").unwrap();
        assert!(name.touched);
        assert!(name.shows_errors());
        assert_eq!(form.errors("name"), vec![ControlError::Required]);
    }

    #[test]
    fn test_valid_submit_emits_all_values() {
        let mut form = FormView::new(form_view("notes"), notes(), None).unwrap();
        assert!(form.set_value("name", "x"));
        let event = form.submit().unwrap();
        let expected = json!({"name": "x", "note": ""}).as_object().cloned().unwrap();
        assert_eq!(event, FormEvent::Save(expected));
        assert!(form.is_submitting());
        assert!(!form.can_submit());
        form.finish_submit();
        assert!(form.can_submit());
    }

    #[test]
    fn test_hidden_and_read_only_fields_have_no_control() {
        let mut entity = notes();
        entity.fields.push(FieldDef::new("secret", "Secret", FieldType::Text).hidden().required());
        let form = FormView::new(form_view("notes"), entity, None).unwrap();
        let keys: Vec<_> = form.controls().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["name", "note"]);
        assert!(form.control("secret").is_none());
        assert!(form.errors("secret").is_empty());
    }

    #[test]
    fn test_edit_seeds_from_record() {
        let record = json!({"id": 3, "name": "Ana", "note": null})
            .as_object()
            .cloned()
            .unwrap();
        let form = FormView::new(form_view("notes"), notes(), Some(record.clone())).unwrap();
        assert!(form.is_editing());
        assert_eq!(form.record(), Some(&record));
        assert_eq!(form.control("name").unwrap().value, json!("Ana"));
        assert_eq!(form.control("note").unwrap().value, json!(""));
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_create_starts_empty_and_checkbox_false() {
        let form = FormView::new(form_view("everything"), all_types(), None).unwrap();
        assert!(!form.is_editing());
        for control in form.controls() {
            let expected = if control.kind == ControlKind::Checkbox {
                json!(false)
            } else {
                json!("")
            };
            assert_eq!(control.value, expected, "{}", control.key);
        }
    }

    #[test]
    fn test_control_kind_per_field_type() {
        let form = FormView::new(form_view("everything"), all_types(), None).unwrap();
        let kind = |k: &str| form.control(k).unwrap().kind.clone();
        assert_eq!(kind("text"), ControlKind::Input(InputFlavour::Text));
        assert_eq!(kind("number"), ControlKind::Input(InputFlavour::Number));
        assert_eq!(kind("email"), ControlKind::Input(InputFlavour::Email));
        assert_eq!(kind("phone"), ControlKind::Input(InputFlavour::Phone));
        assert_eq!(kind("image"), ControlKind::Input(InputFlavour::Url));
        assert_eq!(kind("latlong"), ControlKind::Input(InputFlavour::LatLong));
        assert_eq!(kind("textarea"), ControlKind::TextArea);
        assert_eq!(kind("date"), ControlKind::DatePicker);
        assert_eq!(kind("datetime"), ControlKind::DateTimePicker);
        assert_eq!(kind("boolean"), ControlKind::Checkbox);
        assert_eq!(
            kind("enum"),
            ControlKind::Select {
                options: vec!["A".into(), "B".into()]
            }
        );
        assert_eq!(
            kind("ref"),
            ControlKind::Reference {
                entity: "users".into()
            }
        );
    }

    #[test]
    fn test_dirty_tracking_and_unknown_keys() {
        let mut form = FormView::new(form_view("notes"), notes(), None).unwrap();
        assert!(!form.is_dirty());
        assert!(!form.set_value("missing", "x"));
        assert!(!form.touch("missing"));
        assert!(form.errors("missing").is_empty());
        form.set_value("note", "hola");
        assert!(form.is_dirty());
        form.set_value("note", "");
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_reinitialize_rebuilds_controls() {
        let mut form = FormView::new(form_view("notes"), notes(), None).unwrap();
        form.set_value("name", "draft");
        form.reinitialize(form_view("everything"), all_types(), None)
            .unwrap();
        assert_eq!(form.entity().name, "everything");
        assert_eq!(form.controls().len(), FieldType::all().len());
        assert!(form.control("name").is_none());

        let err = form
            .reinitialize(form_view("notes"), all_types(), None)
            .unwrap_err();
        assert!(matches!(err, ViewError::EntityMismatch { .. }));
        assert_eq!(form.entity().name, "everything");
    }

    #[test]
    fn test_layout_and_cancel() {
        let form = FormView::new(form_view("notes"), notes(), None).unwrap();
        assert_eq!(form.layout(), FormLayout::Double);
        assert_eq!(form.cancel(), FormEvent::Cancel);
    }

    #[test]
    fn test_rejects_table_view() {
        let view: ViewDefinition = serde_json::from_value(json!({
            "id": "notes-table",
            "entity": "notes",
            "type": "table",
            "name": "Notes",
            "config": { "columns": ["name"] },
            "roles": ["ALL"]
        }))
        .unwrap();
        let err = FormView::new(view, notes(), None).unwrap_err();
        assert_eq!(
            err,
            ViewError::WrongViewType {
                view_id: "notes-table".into(),
                expected: ViewType::Form,
                found: ViewType::Table,
            }
        );
    }
}
