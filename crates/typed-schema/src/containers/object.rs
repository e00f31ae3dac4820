use indexmap::IndexMap;

use super::traversal::{
    can_skip_children, chunk_boundary, insert_child, retain_undeclared, settle,
    should_stop_on_first_error, verbatim, Chunker, UNDEFINED,
};
use crate::mode::ValidationMode;
use crate::path::LazyPath;
use crate::result::{type_mismatch, FailureTracker, Validation};
use crate::schema::{BaseInfo, Schema, SchemaFlags};
use crate::state::InternalState;
use crate::value::{Map, Value};

/// Objects with declared fields, validated in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    pub base: BaseInfo,
    fields: IndexMap<String, Schema>,
    allow_unknown_keys: bool,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares (or replaces) a field. Absent keys are validated as `undefined`, so wrap
    /// the schema in `optional` to make the field optional.
    pub fn field(mut self, key: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.fields.insert(key.into(), schema.into());
        self
    }

    pub fn fields<I, K, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<Schema>,
    {
        for (key, schema) in fields {
            self.fields.insert(key.into(), schema.into());
        }
        self
    }

    /// Keys not declared here are kept and never reported as unknown.
    pub fn allow_unknown_keys(mut self, allow: bool) -> Self {
        self.allow_unknown_keys = allow;
        self
    }

    /// This object's fields followed by `other`'s; `other` wins on duplicate keys.
    pub fn extend(mut self, other: ObjectSchema) -> Self {
        self.fields.extend(other.fields);
        self.allow_unknown_keys |= other.allow_unknown_keys;
        self
    }

    pub fn field_schema(&self, key: &str) -> Option<&Schema> {
        self.fields.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub(crate) fn flags(&self) -> SchemaFlags {
        let mut flags = SchemaFlags::combined(self.fields.values().map(Schema::flags)).container();
        flags.is_or_contains_object_potentially_needing_unknown_key_removal |= !self.allow_unknown_keys;
        flags
    }

    fn note_keys(&self, input: &Map, state: &mut InternalState, path: &LazyPath) {
        if !state.tracks_unknown_keys() {
            return;
        }
        if self.allow_unknown_keys {
            state.allow_all_keys(path);
        } else {
            state.note_keys(
                path,
                self.fields.keys().cloned().collect(),
                input.keys().cloned().collect(),
            );
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
        let Value::Object(input) = value else {
            return type_mismatch(mode, "object", value, path);
        };
        if can_skip_children(flags, state, mode) {
            return Ok(verbatim(value, state));
        }
        let stop_early = should_stop_on_first_error(flags, state, mode);
        self.note_keys(input, state, path);

        let mut output = Map::with_capacity(self.fields.len());
        let mut tracker = FailureTracker::default();
        state.enter_container();
        for (key, schema) in &self.fields {
            let child = input.get(key).unwrap_or(&UNDEFINED);
            let outcome = schema.internal_validate(child, state, &path.append(key.as_str()));
            let (out, is_error) = settle(outcome, &mut tracker);
            insert_child(&mut output, key, out);
            if is_error && stop_early {
                break;
            }
        }
        state.exit_container();

        retain_undeclared(state, path, input, |key| self.fields.contains_key(key));
        tracker.finish(Value::Object(output))
    }

    pub(crate) async fn validate_async(
        &self,
        flags: &SchemaFlags,
        value: &Value,
        state: &mut InternalState,
        path: &LazyPath,
        mode: ValidationMode,
    ) -> Validation {
        let Value::Object(input) = value else {
            return type_mismatch(mode, "object", value, path);
        };
        if can_skip_children(flags, state, mode) {
            return Ok(verbatim(value, state));
        }
        let stop_early = should_stop_on_first_error(flags, state, mode);
        self.note_keys(input, state, path);

        let mut output = Map::with_capacity(self.fields.len());
        let mut tracker = FailureTracker::default();
        let mut chunker = Chunker::new(state);
        state.enter_container();
        for (key, schema) in &self.fields {
            chunk_boundary(&mut chunker, schema.estimated_validation_time_complexity(), state).await;
            let child = input.get(key).unwrap_or(&UNDEFINED);
            let outcome = schema
                .validate_child_async(child, state, &path.append(key.as_str()))
                .await;
            let (out, is_error) = settle(outcome, &mut tracker);
            insert_child(&mut output, key, out);
            if is_error && stop_early {
                break;
            }
        }
        state.exit_container();

        retain_undeclared(state, path, input, |key| self.fields.contains_key(key));
        tracker.finish(Value::Object(output))
    }
}

schema_builders!(ObjectSchema, Object);
