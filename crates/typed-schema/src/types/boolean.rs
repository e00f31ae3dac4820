use super::{normalize_forms, SerializationForm};
use crate::mode::ValidationMode;
use crate::path::LazyPath;
use crate::result::{fail, type_mismatch, ErrorKind, Validation};
use crate::schema::BaseInfo;
use crate::state::{InternalState, Transformation};
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct BooleanSchema {
    pub base: BaseInfo,
    allowed_values: Vec<bool>,
    forms: Vec<SerializationForm>,
}

impl Default for BooleanSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl BooleanSchema {
    pub fn new() -> Self {
        Self {
            base: BaseInfo::new(),
            allowed_values: Vec::new(),
            forms: vec![SerializationForm::Native],
        }
    }

    /// Restricts the value to one of `values`; an empty list allows both.
    pub fn allowed_values(mut self, values: impl IntoIterator<Item = bool>) -> Self {
        self.allowed_values = values.into_iter().collect();
        self
    }

    pub fn allowed_serialization_forms(mut self, forms: &[SerializationForm]) -> Self {
        self.forms = normalize_forms(forms);
        self
    }

    pub(crate) fn uses_custom_serdes(&self) -> bool {
        self.forms.contains(&SerializationForm::String)
    }

    pub(crate) fn validate(
        &self,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
        mode: ValidationMode,
    ) -> Validation {
        let transformation = state.transformation();
        let b = match value {
            Value::Bool(b) if transformation != Transformation::Deserialize
                || self.forms.contains(&SerializationForm::Native) =>
            {
                *b
            }
            Value::String(s)
                if transformation == Transformation::Deserialize
                    && self.forms.contains(&SerializationForm::String) =>
            {
                match s.as_str() {
                    "true" => true,
                    "false" => false,
                    _ => return type_mismatch(mode, "boolean", value, path),
                }
            }
            _ => return type_mismatch(mode, "boolean", value, path),
        };

        if !self.allowed_values.is_empty() && !self.allowed_values.contains(&b) {
            let allowed = self.allowed_values.clone();
            return fail(
                mode,
                ErrorKind::Constraint,
                path,
                move || format!("Expected {}, found {b}", super::describe_choices(&allowed)),
                Value::Bool(b),
            );
        }

        Ok(match (transformation, self.forms.first()) {
            (Transformation::Serialize, Some(SerializationForm::String)) => {
                Value::String(b.to_string())
            }
            _ => Value::Bool(b),
        })
    }
}

schema_builders!(BooleanSchema, Boolean);
