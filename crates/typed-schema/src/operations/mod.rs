//! Public operations on a [`Schema`].
//!
//! Each operation builds a fresh [`InternalState`], runs the core contract on the root
//! schema, applies deferred operations and unknown-key policies, then formats the
//! outcome. Synchronous variants report misuse (a schema that can only run
//! asynchronously) as [`SchemaError`]; data problems are always reported inside the
//! result structs.

mod options;
mod results;
mod unknown_keys;

pub use options::OperationOptions;
pub use results::{
    CloningResult, DeserializationResult, SerializationResult, StringifyResult, ValidationReport,
};

use crate::error::{OperationError, SchemaError};
use crate::path::LazyPath;
use crate::result::{ErrorLevel, Validation, ValidationFailure};
use crate::schema::Schema;
use crate::state::{InternalState, Transformation};
use crate::value::Value;

/// What an operation produced after post-processing.
struct Finished {
    value: Option<Value>,
    error: Option<OperationError>,
}

fn finish(outcome: Validation, state: &mut InternalState) -> Finished {
    let (mut output, failure) = match outcome {
        Ok(value) => (value, None),
        Err(failure) => (failure.invalid_value.clone(), Some(failure)),
    };
    if let Some(failure) = failure.as_ref().filter(|f| f.level == ErrorLevel::Error) {
        return Finished {
            value: None,
            error: Some(OperationError::from(failure)),
        };
    }

    state.run_deferred(&mut output);
    let unknown = unknown_keys::post_process(
        state.take_unknown_keys(),
        &mut output,
        state.operation_validation(),
        state.fail_on_unknown_keys(),
        state.remove_unknown_keys(),
    );

    let failure = most_severe(failure, unknown);
    match failure {
        Some(failure) if failure.level == ErrorLevel::Error => Finished {
            value: None,
            error: Some(OperationError::from(&failure)),
        },
        failure => Finished {
            value: Some(output),
            error: failure.as_ref().map(OperationError::from),
        },
    }
}

// The traversal failure wins ties.
fn most_severe(
    traversal: Option<ValidationFailure>,
    unknown: Option<ValidationFailure>,
) -> Option<ValidationFailure> {
    match (traversal, unknown) {
        (Some(t), Some(u)) if u.level > t.level => Some(u),
        (Some(t), _) => Some(t),
        (None, u) => u,
    }
}

fn run_sync(
    schema: &Schema,
    value: &Value,
    options: &OperationOptions,
    transformation: Transformation,
) -> Result<Finished, SchemaError> {
    let mut state = InternalState::new(options.settings(transformation, false));
    let outcome = schema.internal_validate(value, &mut state, &LazyPath::root());
    if let Some(schema_type) = state.async_required() {
        return Err(SchemaError::AsyncRequired { schema_type });
    }
    Ok(finish(outcome, &mut state))
}

async fn run_async(
    schema: &Schema,
    value: &Value,
    options: &OperationOptions,
    transformation: Transformation,
) -> Finished {
    let mut state = InternalState::new(options.settings(transformation, true));
    let outcome = schema
        .internal_validate_async(value, &mut state, &LazyPath::root())
        .await;
    finish(outcome, &mut state)
}

fn stringify_finished(finished: Finished) -> StringifyResult {
    let Finished { value, error } = finished;
    let Some(value) = value else {
        return StringifyResult::from_parts(None, error);
    };
    let text = value
        .to_json()
        .map_err(|e| e.to_string())
        .and_then(|json| serde_json::to_string(&json).map_err(|e| e.to_string()));
    match text {
        Ok(text) => StringifyResult::from_parts(Some(text), error),
        Err(message) => StringifyResult::from_parts(None, Some(OperationError::json(message))),
    }
}

fn parse_json(text: &str) -> Result<Value, DeserializationResult> {
    serde_json::from_str::<serde_json::Value>(text)
        .map(Value::from)
        .map_err(|e| DeserializationResult::from_parts(None, Some(OperationError::json(e.to_string()))))
}

impl Schema {
    /// Checks `value` without transforming it.
    pub fn validate(&self, value: &Value, options: &OperationOptions) -> Result<ValidationReport, SchemaError> {
        let finished = run_sync(self, value, options, Transformation::None)?;
        Ok(ValidationReport {
            error: finished.error,
        })
    }

    pub async fn validate_async(&self, value: &Value, options: &OperationOptions) -> ValidationReport {
        let finished = run_async(self, value, options, Transformation::None).await;
        ValidationReport {
            error: finished.error,
        }
    }

    /// Converts an in-memory value to its JSON-compatible form.
    pub fn serialize(&self, value: &Value, options: &OperationOptions) -> Result<SerializationResult, SchemaError> {
        let finished = run_sync(self, value, options, Transformation::Serialize)?;
        Ok(SerializationResult::from_parts(finished.value, finished.error))
    }

    pub async fn serialize_async(&self, value: &Value, options: &OperationOptions) -> SerializationResult {
        let finished = run_async(self, value, options, Transformation::Serialize).await;
        SerializationResult::from_parts(finished.value, finished.error)
    }

    /// Converts a JSON-compatible value to its in-memory form.
    pub fn deserialize(
        &self,
        value: &Value,
        options: &OperationOptions,
    ) -> Result<DeserializationResult, SchemaError> {
        let finished = run_sync(self, value, options, Transformation::Deserialize)?;
        Ok(DeserializationResult::from_parts(finished.value, finished.error))
    }

    pub async fn deserialize_async(&self, value: &Value, options: &OperationOptions) -> DeserializationResult {
        let finished = run_async(self, value, options, Transformation::Deserialize).await;
        DeserializationResult::from_parts(finished.value, finished.error)
    }

    /// Deep-copies `value`; the copy shares nothing with the input.
    pub fn clone_value(&self, value: &Value, options: &OperationOptions) -> Result<CloningResult, SchemaError> {
        let finished = run_sync(self, value, options, Transformation::Clone)?;
        Ok(CloningResult::from_parts(finished.value, finished.error))
    }

    pub async fn clone_value_async(&self, value: &Value, options: &OperationOptions) -> CloningResult {
        let finished = run_async(self, value, options, Transformation::Clone).await;
        CloningResult::from_parts(finished.value, finished.error)
    }

    /// Serializes `value` and renders it as JSON text.
    pub fn stringify(&self, value: &Value, options: &OperationOptions) -> Result<StringifyResult, SchemaError> {
        let finished = run_sync(self, value, options, Transformation::Serialize)?;
        Ok(stringify_finished(finished))
    }

    pub async fn stringify_async(&self, value: &Value, options: &OperationOptions) -> StringifyResult {
        stringify_finished(run_async(self, value, options, Transformation::Serialize).await)
    }

    /// Parses JSON text and deserializes the result.
    pub fn parse(&self, text: &str, options: &OperationOptions) -> Result<DeserializationResult, SchemaError> {
        match parse_json(text) {
            Ok(value) => self.deserialize(&value, options),
            Err(result) => Ok(result),
        }
    }

    pub async fn parse_async(&self, text: &str, options: &OperationOptions) -> DeserializationResult {
        match parse_json(text) {
            Ok(value) => self.deserialize_async(&value, options).await,
            Err(result) => result,
        }
    }
}
