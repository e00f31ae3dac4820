use crate::mode::ValidationMode;
use crate::path::LazyPath;
use crate::result::Validation;
use crate::schema::BaseInfo;
use crate::state::{InternalState, Transformation};
use crate::value::Value;

/// Accepts every value, including `undefined`. Objects it sees are exempt from
/// unknown-key handling.
#[derive(Debug, Clone, Default)]
pub struct AnySchema {
    pub base: BaseInfo,
}

impl AnySchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn validate(
        &self,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
        _mode: ValidationMode,
    ) -> Validation {
        if matches!(value, Value::Object(_)) {
            state.allow_all_keys(path);
        }
        Ok(match state.transformation() {
            Transformation::Clone => value.deep_clone(),
            _ => value.clone(),
        })
    }
}

schema_builders!(AnySchema, Any);
