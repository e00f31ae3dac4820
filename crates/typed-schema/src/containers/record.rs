use std::collections::HashSet;

use regex::Regex;

use super::traversal::{
    can_skip_children, chunk_boundary, insert_child, retain_undeclared, settle,
    should_stop_on_first_error, verbatim, Chunker,
};
use crate::mode::ValidationMode;
use crate::path::LazyPath;
use crate::result::{type_mismatch, FailureTracker, Validation};
use crate::schema::base::UNBOUNDED_COLLECTION_SIZE;
use crate::schema::{BaseInfo, Schema, SchemaFlags};
use crate::state::{InternalState, Transformation};
use crate::value::{Map, Value};

#[derive(Debug, Clone)]
enum KeyMatcher {
    Schema(Schema),
    Pattern(Regex),
}

/// Objects with arbitrary keys sharing one value schema.
///
/// Keys the key schema (or pattern) rejects are not validated; they are unknown keys
/// unless `allow_unknown_keys` is set.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    pub base: BaseInfo,
    keys: KeyMatcher,
    values: Schema,
    allow_unknown_keys: bool,
}

impl RecordSchema {
    pub fn with_key_schema(keys: Schema, values: Schema) -> Self {
        Self::new(KeyMatcher::Schema(keys), values)
    }

    pub fn with_key_pattern(pattern: Regex, values: Schema) -> Self {
        Self::new(KeyMatcher::Pattern(pattern), values)
    }

    fn new(keys: KeyMatcher, values: Schema) -> Self {
        Self {
            base: BaseInfo::new(),
            keys,
            values,
            allow_unknown_keys: false,
        }
    }

    pub fn allow_unknown_keys(mut self, allow: bool) -> Self {
        self.allow_unknown_keys = allow;
        self
    }

    pub fn values(&self) -> &Schema {
        &self.values
    }

    pub(crate) fn flags(&self) -> SchemaFlags {
        let per_entry = match &self.keys {
            KeyMatcher::Schema(keys) => SchemaFlags::combined([keys.flags(), self.values.flags()]),
            KeyMatcher::Pattern(_) => SchemaFlags::combined([self.values.flags()]),
        };
        let mut flags = per_entry.times(UNBOUNDED_COLLECTION_SIZE).container();
        flags.is_or_contains_object_potentially_needing_unknown_key_removal |= !self.allow_unknown_keys;
        flags
    }

    fn key_cost(&self) -> u64 {
        match &self.keys {
            KeyMatcher::Schema(schema) => schema.estimated_validation_time_complexity(),
            KeyMatcher::Pattern(_) => 1,
        }
    }

    fn is_known_key(&self, key: &str, state: &mut InternalState, path: &LazyPath) -> bool {
        match &self.keys {
            KeyMatcher::Pattern(pattern) => pattern.is_match(key),
            KeyMatcher::Schema(schema) => {
                let mut check = state.isolated(Transformation::None, ValidationMode::Hard);
                let known = schema
                    .internal_validate(&Value::from(key), &mut check, &path.append(key))
                    .is_ok();
                state.absorb(check);
                known
            }
        }
    }

    async fn is_known_key_async(&self, key: &str, state: &mut InternalState, path: &LazyPath) -> bool {
        match &self.keys {
            KeyMatcher::Pattern(pattern) => pattern.is_match(key),
            KeyMatcher::Schema(schema) => {
                let mut check = state.isolated(Transformation::None, ValidationMode::Hard);
                let known = schema
                    .internal_validate_async(&Value::from(key), &mut check, &path.append(key))
                    .await
                    .is_ok();
                state.absorb(check);
                known
            }
        }
    }

    fn note_known(&self, known: &[String], input: &Map, state: &mut InternalState, path: &LazyPath) {
        if state.tracks_unknown_keys() {
            if self.allow_unknown_keys {
                state.allow_all_keys(path);
            } else {
                state.note_keys(path, known.to_vec(), input.keys().cloned().collect());
            }
        }
    }

    fn classify(&self, input: &Map, state: &mut InternalState, path: &LazyPath) -> Vec<String> {
        let known: Vec<String> = input
            .keys()
            .filter(|key| self.is_known_key(key, state, path))
            .cloned()
            .collect();
        self.note_known(&known, input, state, path);
        known
    }

    async fn classify_async(
        &self,
        input: &Map,
        state: &mut InternalState,
        path: &LazyPath,
    ) -> Vec<String> {
        let cost = self.key_cost();
        let mut known = Vec::new();
        let mut chunker = Chunker::new(state);
        for key in input.keys() {
            chunk_boundary(&mut chunker, cost, state).await;
            if self.is_known_key_async(key, state, path).await {
                known.push(key.clone());
            }
        }
        self.note_known(&known, input, state, path);
        known
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
        let known = self.classify(input, state, path);

        let mut output = Map::with_capacity(known.len());
        let mut tracker = FailureTracker::default();
        state.enter_container();
        for key in &known {
            let Some(child) = input.get(key) else { continue };
            let outcome = self
                .values
                .internal_validate(child, state, &path.append(key.as_str()));
            let (out, is_error) = settle(outcome, &mut tracker);
            insert_child(&mut output, key, out);
            if is_error && stop_early {
                break;
            }
        }
        state.exit_container();

        let known: HashSet<&str> = known.iter().map(String::as_str).collect();
        retain_undeclared(state, path, input, |key| known.contains(key));
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
        let known = self.classify_async(input, state, path).await;

        let cost = self.values.estimated_validation_time_complexity();
        let mut output = Map::with_capacity(known.len());
        let mut tracker = FailureTracker::default();
        let mut chunker = Chunker::new(state);
        state.enter_container();
        for key in &known {
            chunk_boundary(&mut chunker, cost, state).await;
            let Some(child) = input.get(key) else { continue };
            let outcome = self
                .values
                .validate_child_async(child, state, &path.append(key.as_str()))
                .await;
            let (out, is_error) = settle(outcome, &mut tracker);
            insert_child(&mut output, key, out);
            if is_error && stop_early {
                break;
            }
        }
        state.exit_container();

        let known: HashSet<&str> = known.iter().map(String::as_str).collect();
        retain_undeclared(state, path, input, |key| known.contains(key));
        tracker.finish(Value::Object(output))
    }
}

schema_builders!(RecordSchema, Record);
