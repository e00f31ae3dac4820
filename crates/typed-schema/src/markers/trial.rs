//! Hard-mode trial runs against a scratch state.
//!
//! Combinators that have to know whether a schema *accepts* a value use these instead of
//! the caller's mode: under [`ValidationMode::None`] every schema reports success, so the
//! caller's own outcome says nothing about a match. Deferred operations and unknown-key
//! records of the trial are discarded; work time and async misuse carry over.

use crate::mode::ValidationMode;
use crate::path::LazyPath;
use crate::schema::Schema;
use crate::state::InternalState;
use crate::value::Value;

pub(crate) fn accepts(
    schema: &Schema,
    value: &Value,
    state: &mut InternalState,
    path: &LazyPath,
) -> bool {
    let mut trial = state.isolated(state.transformation(), ValidationMode::Hard);
    let accepted = schema.internal_validate(value, &mut trial, path).is_ok();
    state.absorb(trial);
    accepted
}

pub(crate) async fn accepts_async(
    schema: &Schema,
    value: &Value,
    state: &mut InternalState,
    path: &LazyPath,
) -> bool {
    let mut trial = state.isolated(state.transformation(), ValidationMode::Hard);
    let accepted = schema
        .internal_validate_async(value, &mut trial, path)
        .await
        .is_ok();
    state.absorb(trial);
    accepted
}
