use super::traversal::{
    can_skip_children, chunk_boundary, settle, should_stop_on_first_error, verbatim, Chunker,
    UNDEFINED,
};
use crate::mode::ValidationMode;
use crate::path::LazyPath;
use crate::result::{fail, type_mismatch, ErrorKind, FailureTracker, Validation};
use crate::schema::{BaseInfo, Schema, SchemaFlags};
use crate::state::InternalState;
use crate::value::Value;

/// Fixed-length arrays with a schema per position.
///
/// Surplus items are an arity failure; when that failure is only a warning (or
/// validation is off) they pass through unchanged.
#[derive(Debug, Clone)]
pub struct TupleSchema {
    pub base: BaseInfo,
    items: Vec<Schema>,
}

impl TupleSchema {
    pub fn new(items: Vec<Schema>) -> Self {
        Self {
            base: BaseInfo::new(),
            items,
        }
    }

    pub fn items(&self) -> &[Schema] {
        &self.items
    }

    pub(crate) fn flags(&self) -> SchemaFlags {
        SchemaFlags::combined(self.items.iter().map(Schema::flags)).container()
    }

    fn check_arity(
        &self,
        input: &[Value],
        value: &Value,
        path: &LazyPath,
        mode: ValidationMode,
        tracker: &mut FailureTracker,
    ) -> bool {
        let (expected, found) = (self.items.len(), input.len());
        if expected == found {
            return false;
        }
        match fail(
            mode,
            ErrorKind::Constraint,
            path,
            move || format!("Expected array with exactly {expected} items, found {found}"),
            value.clone(),
        ) {
            Err(failure) => tracker.record(failure),
            Ok(_) => false,
        }
    }

    pub(crate) fn validate(
        &self,
        flags: &SchemaFlags,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
        mode: ValidationMode,
    ) -> Validation {
        let Value::Array(input) = value else {
            return type_mismatch(mode, "array", value, path);
        };
        if can_skip_children(flags, state, mode) {
            return Ok(verbatim(value, state));
        }
        let stop_early = should_stop_on_first_error(flags, state, mode);
        let mut tracker = FailureTracker::default();
        if self.check_arity(input, value, path, mode, &mut tracker) && stop_early {
            return tracker.finish(value.clone());
        }

        let mut output = Vec::with_capacity(self.items.len());
        state.enter_container();
        for (index, schema) in self.items.iter().enumerate() {
            let item = input.get(index).unwrap_or(&UNDEFINED);
            let outcome = schema.internal_validate(item, state, &path.append(index));
            let (out, is_error) = settle(outcome, &mut tracker);
            output.push(out);
            if is_error && stop_early {
                break;
            }
        }
        state.exit_container();

        if !tracker.has_error() {
            output.extend(input.iter().skip(self.items.len()).map(|item| verbatim(item, state)));
        }
        tracker.finish(Value::Array(output))
    }

    pub(crate) async fn validate_async(
        &self,
        flags: &SchemaFlags,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
        mode: ValidationMode,
    ) -> Validation {
        let Value::Array(input) = value else {
            return type_mismatch(mode, "array", value, path);
        };
        if can_skip_children(flags, state, mode) {
            return Ok(verbatim(value, state));
        }
        let stop_early = should_stop_on_first_error(flags, state, mode);
        let mut tracker = FailureTracker::default();
        if self.check_arity(input, value, path, mode, &mut tracker) && stop_early {
            return tracker.finish(value.clone());
        }

        let mut output = Vec::with_capacity(self.items.len());
        let mut chunker = Chunker::new(state);
        state.enter_container();
        for (index, schema) in self.items.iter().enumerate() {
            chunk_boundary(&mut chunker, schema.estimated_validation_time_complexity(), state).await;
            let item = input.get(index).unwrap_or(&UNDEFINED);
            let outcome = schema
                .validate_child_async(item, state, &path.append(index))
                .await;
            let (out, is_error) = settle(outcome, &mut tracker);
            output.push(out);
            if is_error && stop_early {
                break;
            }
        }
        state.exit_container();

        if !tracker.has_error() {
            output.extend(input.iter().skip(self.items.len()).map(|item| verbatim(item, state)));
        }
        tracker.finish(Value::Array(output))
    }
}

schema_builders!(TupleSchema, Tuple);
