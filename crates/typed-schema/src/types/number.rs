use super::{describe_choices, normalize_forms, SerializationForm};
use crate::mode::ValidationMode;
use crate::path::LazyPath;
use crate::result::{fail, type_mismatch, ErrorKind, Validation};
use crate::schema::BaseInfo;
use crate::state::{InternalState, Transformation};
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Bound {
    value: f64,
    exclusive: bool,
}

/// Finite numbers, optionally restricted by allowed values, an inclusive or exclusive
/// range and divisibility.
#[derive(Debug, Clone)]
pub struct NumberSchema {
    pub base: BaseInfo,
    allowed_values: Vec<f64>,
    min: Option<Bound>,
    max: Option<Bound>,
    divisible_by: Option<f64>,
    forms: Vec<SerializationForm>,
}

impl Default for NumberSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl NumberSchema {
    pub fn new() -> Self {
        Self {
            base: BaseInfo::new(),
            allowed_values: Vec::new(),
            min: None,
            max: None,
            divisible_by: None,
            forms: vec![SerializationForm::Native],
        }
    }

    pub fn allowed_values(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.allowed_values = values.into_iter().collect();
        self
    }

    pub fn min(mut self, value: f64) -> Self {
        self.min = Some(Bound { value, exclusive: false });
        self
    }

    pub fn exclusive_min(mut self, value: f64) -> Self {
        self.min = Some(Bound { value, exclusive: true });
        self
    }

    pub fn max(mut self, value: f64) -> Self {
        self.max = Some(Bound { value, exclusive: false });
        self
    }

    pub fn exclusive_max(mut self, value: f64) -> Self {
        self.max = Some(Bound { value, exclusive: true });
        self
    }

    pub fn divisible_by(mut self, divisor: f64) -> Self {
        self.divisible_by = Some(divisor);
        self
    }

    pub fn allowed_serialization_forms(mut self, forms: &[SerializationForm]) -> Self {
        self.forms = normalize_forms(forms);
        self
    }

    pub(crate) fn uses_custom_serdes(&self) -> bool {
        self.forms.contains(&SerializationForm::String)
    }

    fn read(&self, value: &Value, transformation: Transformation) -> Option<f64> {
        let deserializing = transformation == Transformation::Deserialize;
        match value {
            Value::Number(n) if !deserializing || self.forms.contains(&SerializationForm::Native) => {
                Some(*n)
            }
            Value::String(s) if deserializing && self.forms.contains(&SerializationForm::String) => {
                s.trim().parse::<f64>().ok()
            }
            _ => None,
        }
    }

    fn check(&self, n: f64) -> Result<(), String> {
        if !n.is_finite() {
            return Err(format!("Expected a finite number, found {n}"));
        }
        if !self.allowed_values.is_empty() && !self.allowed_values.contains(&n) {
            return Err(format!(
                "Expected {}, found {n}",
                describe_choices(&self.allowed_values)
            ));
        }
        if let Some(min) = self.min {
            if n < min.value || (min.exclusive && n == min.value) {
                let op = if min.exclusive { ">" } else { ">=" };
                return Err(format!("Expected number {op} {}, found {n}", min.value));
            }
        }
        if let Some(max) = self.max {
            if n > max.value || (max.exclusive && n == max.value) {
                let op = if max.exclusive { "<" } else { "<=" };
                return Err(format!("Expected number {op} {}, found {n}", max.value));
            }
        }
        if let Some(divisor) = self.divisible_by {
            if divisor != 0.0 && !is_multiple(n, divisor) {
                return Err(format!("Expected a multiple of {divisor}, found {n}"));
            }
        }
        Ok(())
    }

    pub(crate) fn validate(
        &self,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
        mode: ValidationMode,
    ) -> Validation {
        let transformation = state.transformation();
        let Some(n) = self.read(value, transformation) else {
            return type_mismatch(mode, "number", value, path);
        };

        if let Err(message) = self.check(n) {
            return fail(mode, ErrorKind::Constraint, path, move || message.clone(), Value::Number(n));
        }

        Ok(match (transformation, self.forms.first()) {
            (Transformation::Serialize, Some(SerializationForm::String)) => {
                Value::String(n.to_string())
            }
            _ => Value::Number(n),
        })
    }
}

// Tolerates the representation error of decimal divisors such as 0.1.
fn is_multiple(n: f64, divisor: f64) -> bool {
    let remainder = (n % divisor).abs();
    let tolerance = 1e-9 * n.abs().max(1.0);
    remainder <= tolerance || (divisor.abs() - remainder) <= tolerance
}

schema_builders!(NumberSchema, Number);
