//! Rules shared by every container traversal.

use crate::mode::ValidationMode;
use crate::path::LazyPath;
use crate::result::{FailureTracker, Validation};
use crate::schema::SchemaFlags;
use crate::state::{InternalState, Transformation};
use crate::value::{Map, Value};

pub(crate) static UNDEFINED: Value = Value::Undefined;

/// Whether traversal may stop at the first error-level failure.
///
/// When custom serdes, unknown-key removal or a transformation are involved, the whole
/// output must be built unless the mode is hard.
pub(crate) fn should_stop_on_first_error(
    flags: &SchemaFlags,
    state: &InternalState,
    mode: ValidationMode,
) -> bool {
    mode == ValidationMode::Hard
        || (!flags.uses_custom_serdes
            && !(state.remove_unknown_keys()
                && flags.is_or_contains_object_potentially_needing_unknown_key_removal)
            && state.transformation() == Transformation::None)
}

/// Nothing below this container can fail, convert or affect unknown-key handling.
pub(crate) fn can_skip_children(
    flags: &SchemaFlags,
    state: &InternalState,
    mode: ValidationMode,
) -> bool {
    mode == ValidationMode::None
        && !flags.uses_custom_serdes
        && !(state.tracks_unknown_keys()
            && flags.is_or_contains_object_potentially_needing_unknown_key_removal)
}

/// The input as the output of a skipped traversal.
pub(crate) fn verbatim(value: &Value, state: &InternalState) -> Value {
    match state.transformation() {
        Transformation::Clone => value.deep_clone(),
        _ => value.clone(),
    }
}

/// Splits a child outcome into the value to place in the output and whether it was an
/// error-level failure.
pub(crate) fn settle(outcome: Validation, tracker: &mut FailureTracker) -> (Value, bool) {
    match outcome {
        Ok(value) => (value, false),
        Err(failure) => {
            let value = failure.invalid_value.clone();
            let is_error = tracker.record(failure);
            (value, is_error)
        }
    }
}

/// Inserts a child's output, leaving absent keys absent.
pub(crate) fn insert_child(output: &mut Map, key: &str, value: Value) {
    if !value.is_undefined() {
        output.insert(key.to_owned(), value);
    }
}

/// Schedules raw copies of the keys no schema converts, so a transformed object keeps
/// them until unknown-key post-processing decides their fate.
pub(crate) fn retain_undeclared(
    state: &mut InternalState,
    path: &LazyPath,
    input: &Map,
    is_declared: impl Fn(&str) -> bool,
) {
    if state.transformation() == Transformation::None {
        return;
    }
    for (key, value) in input {
        if !is_declared(key) {
            state.defer_retain(path, key.clone(), value);
        }
    }
}

/// Groups children into chunks whose summed complexity stays under the threshold.
pub(crate) struct Chunker {
    threshold: u64,
    used: u64,
}

impl Chunker {
    pub fn new(state: &InternalState) -> Self {
        Self {
            threshold: state.complexity_threshold(),
            used: 0,
        }
    }

    /// Accounts for a child of `cost`; returns `true` if it starts a new chunk.
    pub fn starts_chunk(&mut self, cost: u64) -> bool {
        if self.used > 0 && self.used.saturating_add(cost) > self.threshold {
            self.used = cost;
            true
        } else {
            self.used = self.used.saturating_add(cost);
            false
        }
    }
}

/// Yields at a chunk boundary if the work interval has elapsed.
pub(crate) async fn chunk_boundary(chunker: &mut Chunker, cost: u64, state: &mut InternalState) {
    if chunker.starts_chunk(cost) && state.should_relax() {
        state.relax().await;
    }
}
