use super::traversal::{
    can_skip_children, chunk_boundary, settle, should_stop_on_first_error, verbatim, Chunker,
};
use crate::mode::ValidationMode;
use crate::path::LazyPath;
use crate::result::{fail, type_mismatch, ErrorKind, FailureTracker, Validation};
use crate::schema::base::UNBOUNDED_COLLECTION_SIZE;
use crate::schema::{BaseInfo, Schema, SchemaFlags};
use crate::state::{InternalState, Transformation};
use crate::value::Value;

/// Homogeneous arrays.
#[derive(Debug, Clone)]
pub struct ArraySchema {
    pub base: BaseInfo,
    items: Schema,
    min_length: Option<usize>,
    max_length: Option<usize>,
    max_entries_to_validate: Option<usize>,
}

impl ArraySchema {
    pub fn new(items: Schema) -> Self {
        Self {
            base: BaseInfo::new(),
            items,
            min_length: None,
            max_length: None,
            max_entries_to_validate: None,
        }
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }

    /// Only the first `count` items are checked by plain validation. Ignored whenever
    /// items must be converted or unknown keys removed.
    pub fn max_entries_to_validate(mut self, count: usize) -> Self {
        self.max_entries_to_validate = Some(count);
        self
    }

    pub fn items(&self) -> &Schema {
        &self.items
    }

    pub(crate) fn flags(&self) -> SchemaFlags {
        let expected_len = self
            .max_length
            .map(|len| len as u64)
            .unwrap_or(UNBOUNDED_COLLECTION_SIZE);
        SchemaFlags::combined([self.items.flags()])
            .times(expected_len)
            .container()
    }

    /// Number of leading items to traverse.
    fn limit(&self, len: usize, flags: &SchemaFlags, state: &InternalState) -> usize {
        let must_visit_all = flags.uses_custom_serdes
            || state.transformation() != Transformation::None
            || (state.tracks_unknown_keys()
                && flags.is_or_contains_object_potentially_needing_unknown_key_removal);
        match self.max_entries_to_validate {
            Some(max) if !must_visit_all => len.min(max),
            _ => len,
        }
    }

    fn check_length(
        &self,
        input: &[Value],
        value: &Value,
        path: &LazyPath,
        mode: ValidationMode,
        tracker: &mut FailureTracker,
    ) -> bool {
        let len = input.len();
        let message = match (self.min_length, self.max_length) {
            (Some(min), _) if len < min => {
                format!("Expected array with at least {min} items, found {len}")
            }
            (_, Some(max)) if len > max => {
                format!("Expected array with at most {max} items, found {len}")
            }
            _ => return false,
        };
        match fail(mode, ErrorKind::Constraint, path, move || message.clone(), value.clone()) {
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
        if self.check_length(input, value, path, mode, &mut tracker) && stop_early {
            return tracker.finish(value.clone());
        }

        let limit = self.limit(input.len(), flags, state);
        let mut output = Vec::with_capacity(limit);
        state.enter_container();
        for (index, item) in input.iter().take(limit).enumerate() {
            let outcome = self.items.internal_validate(item, state, &path.append(index));
            let (out, is_error) = settle(outcome, &mut tracker);
            output.push(out);
            if is_error && stop_early {
                break;
            }
        }
        state.exit_container();

        if output.len() < input.len() && !tracker.has_error() {
            output.extend(input[output.len()..].iter().cloned());
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
        if self.check_length(input, value, path, mode, &mut tracker) && stop_early {
            return tracker.finish(value.clone());
        }

        let limit = self.limit(input.len(), flags, state);
        let cost = self.items.estimated_validation_time_complexity();
        let mut output = Vec::with_capacity(limit);
        let mut chunker = Chunker::new(state);
        state.enter_container();
        for (index, item) in input.iter().take(limit).enumerate() {
            chunk_boundary(&mut chunker, cost, state).await;
            let outcome = self
                .items
                .validate_child_async(item, state, &path.append(index))
                .await;
            let (out, is_error) = settle(outcome, &mut tracker);
            output.push(out);
            if is_error && stop_early {
                break;
            }
        }
        state.exit_container();

        if output.len() < input.len() && !tracker.has_error() {
            output.extend(input[output.len()..].iter().cloned());
        }
        tracker.finish(Value::Array(output))
    }
}

schema_builders!(ArraySchema, Array);
