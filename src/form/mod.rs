// Form model - the registration form's fields, snapshots, and validation
// results
//
// The fragment markup supplies the stable identifiers; this module gives
// them types. A FormSnapshot is the form's current values frozen for one
// validation pass; a ValidationResult is what one pass produced and is the
// single source of truth the visible error markers are derived from.

pub mod rules;
pub mod submit;

use crate::fragment::FormDescriptor;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Element id of the registration form
pub const FORM_ID: &str = "volunteerform";

/// Element id of the success-message region (spelling is the markup's)
pub const SUCCESS_REGION_ID: &str = "sucessmessage";

/// The tracked fields, in evaluation order. Discriminant order is the order
/// rules run in and the order errors are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    DocumentId,
    Phone,
    BirthDate,
    Address,
    PostalCode,
    City,
    State,
}

impl Field {
    /// Every tracked field, in evaluation order
    pub const ALL: [Field; 9] = [
        Field::Name,
        Field::Email,
        Field::DocumentId,
        Field::Phone,
        Field::BirthDate,
        Field::Address,
        Field::PostalCode,
        Field::City,
        Field::State,
    ];

    /// The element id this field is bound to in the fragment markup
    pub fn element_id(self) -> &'static str {
        match self {
            Field::Name => "nome",
            Field::Email => "email",
            Field::DocumentId => "cpf",
            Field::Phone => "telefone",
            Field::BirthDate => "nascimento",
            Field::Address => "endereco",
            Field::PostalCode => "cep",
            Field::City => "cidade",
            Field::State => "estado",
        }
    }

    /// Reverse lookup from an element id
    pub fn from_element_id(id: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.element_id() == id)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

/// One field-rule failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Outcome of one validation pass.
///
/// `data` is populated only when `valid` is true, and then mirrors every
/// named control in the order the form enumerates them. `errors` holds one
/// entry per failing rule, in evaluation order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub data: Vec<(String, String)>,
    pub errors: Vec<FieldError>,
}

/// The form's values frozen for one validation pass
#[derive(Debug, Clone)]
pub struct FormSnapshot {
    /// Tracked-field values by field; a field whose control is absent from
    /// the fragment maps to None (its rule still runs, and fails)
    values: HashMap<Field, String>,
    /// (name, value) for every named control, in document order - the
    /// accepted data record mirrors exactly this
    entries: Vec<(String, String)>,
}

impl FormSnapshot {
    /// Build a snapshot straight from field values; the data record is
    /// derived from the tracked fields in evaluation order
    #[cfg(test)]
    pub fn from_values(values: HashMap<Field, String>) -> Self {
        let entries = Field::ALL
            .into_iter()
            .filter_map(|f| {
                values
                    .get(&f)
                    .map(|v| (f.element_id().to_string(), v.clone()))
            })
            .collect();
        Self { values, entries }
    }

    /// Current value of a tracked field, None when the control is missing
    pub fn value(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}

/// Live state for a mounted registration form: the descriptor the fragment
/// declared, the current values, and the markers derived from the last
/// validation pass.
#[derive(Debug, Clone)]
pub struct FormState {
    descriptor: FormDescriptor,
    /// Current value per control, indexed like `descriptor.controls`
    values: Vec<String>,
    /// At most one marker per field, derived from the latest result
    markers: Vec<FieldError>,
}

impl FormState {
    /// Bind a freshly mounted form. Values start from whatever the markup
    /// declared.
    pub fn bind(descriptor: FormDescriptor) -> Self {
        let values = descriptor.controls.iter().map(|c| c.value.clone()).collect();
        Self {
            descriptor,
            values,
            markers: Vec::new(),
        }
    }

    /// Set a control's value by element id. Returns false when no control
    /// has that id.
    pub fn set_value(&mut self, element_id: &str, value: &str) -> bool {
        match self.index_of(element_id) {
            Some(i) => {
                self.values[i] = value.to_string();
                true
            }
            None => false,
        }
    }

    /// Whether the fragment declared a control with this element id
    pub fn has_control(&self, element_id: &str) -> bool {
        self.index_of(element_id).is_some()
    }

    fn index_of(&self, element_id: &str) -> Option<usize> {
        self.descriptor
            .controls
            .iter()
            .position(|c| c.id.as_deref() == Some(element_id))
    }

    /// Freeze the current values for a validation pass
    pub fn snapshot(&self) -> FormSnapshot {
        let mut values = HashMap::new();
        for field in Field::ALL {
            if let Some(i) = self.index_of(field.element_id()) {
                values.insert(field, self.values[i].clone());
            }
        }
        let entries = self
            .descriptor
            .controls
            .iter()
            .zip(&self.values)
            .filter_map(|(c, v)| c.name.clone().map(|name| (name, v.clone())))
            .collect();
        FormSnapshot { values, entries }
    }

    /// Derive the visible markers from a validation result: one marker per
    /// failing field whose control actually exists. Replaces whatever the
    /// previous pass left behind, so markers never accumulate.
    pub fn apply_result(&mut self, result: &ValidationResult) {
        self.markers = result
            .errors
            .iter()
            .filter(|e| self.has_control(e.field.element_id()))
            .cloned()
            .collect();
    }

    /// Clear the marker for one field (user edited it)
    pub fn clear_marker(&mut self, field: Field) {
        self.markers.retain(|m| m.field != field);
    }

    pub fn markers(&self) -> &[FieldError] {
        &self.markers
    }

    /// Reset every control to empty and drop all markers
    pub fn reset(&mut self) {
        for value in &mut self.values {
            value.clear();
        }
        self.markers.clear();
    }

    /// Current value by element id, for display
    pub fn value_of(&self, element_id: &str) -> Option<&str> {
        self.index_of(element_id).map(|i| self.values[i].as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::ControlDescriptor;

    fn control(id: &str, name: &str, value: &str) -> ControlDescriptor {
        ControlDescriptor {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            value: value.to_string(),
        }
    }

    fn sample_form() -> FormState {
        FormState::bind(FormDescriptor {
            controls: vec![
                control("nome", "nome", ""),
                control("email", "email", "x@y.z"),
            ],
        })
    }

    #[test]
    fn test_bind_takes_markup_values() {
        let form = sample_form();
        assert_eq!(form.value_of("email"), Some("x@y.z"));
        assert_eq!(form.value_of("nome"), Some(""));
    }

    #[test]
    fn test_set_value_unknown_control() {
        let mut form = sample_form();
        assert!(!form.set_value("cpf", "123"));
        assert!(form.set_value("nome", "Ana"));
        assert_eq!(form.value_of("nome"), Some("Ana"));
    }

    #[test]
    fn test_snapshot_entries_follow_document_order() {
        let mut form = sample_form();
        form.set_value("nome", "Ana");
        let snap = form.snapshot();
        assert_eq!(
            snap.entries(),
            &[
                ("nome".to_string(), "Ana".to_string()),
                ("email".to_string(), "x@y.z".to_string()),
            ]
        );
        assert_eq!(snap.value(Field::Name), Some("Ana"));
        // Control missing from the fragment -> no value in the snapshot
        assert_eq!(snap.value(Field::DocumentId), None);
    }

    #[test]
    fn test_markers_only_for_present_controls() {
        let mut form = sample_form();
        let result = ValidationResult {
            valid: false,
            data: Vec::new(),
            errors: vec![
                FieldError {
                    field: Field::Name,
                    message: "Nome é obrigatório".to_string(),
                },
                FieldError {
                    field: Field::DocumentId,
                    message: "CPF inválido (11 números)".to_string(),
                },
            ],
        };
        form.apply_result(&result);
        assert_eq!(form.markers().len(), 1);
        assert_eq!(form.markers()[0].field, Field::Name);
    }

    #[test]
    fn test_clear_marker_on_edit() {
        let mut form = sample_form();
        form.apply_result(&ValidationResult {
            valid: false,
            data: Vec::new(),
            errors: vec![FieldError {
                field: Field::Name,
                message: "Nome é obrigatório".to_string(),
            }],
        });
        form.clear_marker(Field::Name);
        assert!(form.markers().is_empty());
    }

    #[test]
    fn test_reset_clears_values_and_markers() {
        let mut form = sample_form();
        form.set_value("nome", "Ana");
        form.apply_result(&ValidationResult {
            valid: false,
            data: Vec::new(),
            errors: vec![FieldError {
                field: Field::Email,
                message: "E-mail inválido".to_string(),
            }],
        });
        form.reset();
        assert_eq!(form.value_of("nome"), Some(""));
        assert_eq!(form.value_of("email"), Some(""));
        assert!(form.markers().is_empty());
    }
}
